use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use media_lists_config::{Config, PathManager};
use owo_colors::OwoColorize;
use serde_json::json;

use crate::output::Output;

pub fn run_config_show(full: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let api_key = if full {
        config.tmdb.api_key.clone()
    } else {
        mask_string(&config.tmdb.api_key)
    };

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "exists": config_file.exists(),
            "backend": {
                "base_url": config.backend.base_url,
                "request_timeout_secs": config.backend.request_timeout_secs,
            },
            "tmdb": {
                "api_key": api_key,
                "base_url": config.tmdb.base_url,
                "image_base_url": config.tmdb.image_base_url,
            },
            "openlibrary": {
                "base_url": config.openlibrary.base_url,
                "covers_base_url": config.openlibrary.covers_base_url,
                "limit": config.openlibrary.limit,
            },
        }));
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("No config file at {}; showing defaults", config_file.display()));
    }

    output.println(format!("\n{}", "Configuration".bright_cyan().bold()));

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Key").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec!["config file".to_string(), config_file.display().to_string()]);
    table.add_row(vec!["backend.base_url".to_string(), config.backend.base_url.clone()]);
    table.add_row(vec![
        "backend.request_timeout_secs".to_string(),
        config.backend.request_timeout_secs.to_string(),
    ]);
    table.add_row(vec!["tmdb.api_key".to_string(), api_key]);
    table.add_row(vec!["tmdb.base_url".to_string(), config.tmdb.base_url.clone()]);
    table.add_row(vec!["tmdb.image_base_url".to_string(), config.tmdb.image_base_url.clone()]);
    table.add_row(vec!["openlibrary.base_url".to_string(), config.openlibrary.base_url.clone()]);
    table.add_row(vec![
        "openlibrary.covers_base_url".to_string(),
        config.openlibrary.covers_base_url.clone(),
    ]);
    table.add_row(vec!["openlibrary.limit".to_string(), config.openlibrary.limit.to_string()]);
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    output.println(table.to_string());

    if !config.is_tmdb_configured() {
        output.warn("Movie and TV search is disabled until tmdb.api_key is set");
    }
    Ok(())
}

pub fn run_config_set(key: String, value: String, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    config.set_value(&key, &value).map_err(|e| eyre!("{}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    let shown = if key == "tmdb.api_key" { mask_string(&value) } else { value };
    output.success(format!("Set {} = {}", key, shown));
    Ok(())
}

pub fn run_config_path(output: &Output) -> Result<()> {
    let paths = PathManager::default();
    if output.is_human() {
        output.info(format!("Config:      {}", paths.config_file().display()));
        output.info(format!("Credentials: {}", paths.credentials_file().display()));
        output.info(format!("Settings:    {}", paths.settings_file().display()));
        output.info(format!("Logs:        {}", paths.log_file().display()));
    } else {
        output.json(&json!({
            "config": paths.config_file().display().to_string(),
            "credentials": paths.credentials_file().display().to_string(),
            "settings": paths.settings_file().display().to_string(),
            "logs": paths.log_file().display().to_string(),
        }));
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.trim().is_empty() || s == "YOUR_API_KEY" {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
