use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_lists_models::{MediaKind, MediaRef};
use media_lists_sources::SearchRegistry;

use super::context::AppContext;
use super::progress::{is_interactive, Spinner};
use super::prompts;
use super::render;
use crate::output::Output;

pub async fn search_with_spinner(registry: &SearchRegistry, kind: MediaKind, query: &str) -> Result<Vec<MediaRef>> {
    if !registry.is_supported(kind) {
        return Err(eyre!(
            "{} search is not available. Set tmdb.api_key with `shelf config set tmdb.api_key <key>`.",
            kind
        ));
    }
    let spinner = Spinner::start(format!("Searching {}s for \"{}\"...", kind, query.trim()));
    let results = registry.search(kind, query).await?;
    spinner.finish();
    Ok(results)
}

/// Choose a result by 1-based `pick`, or interactively on a terminal
pub fn pick_result(mut results: Vec<MediaRef>, pick: Option<usize>, output: &Output) -> Result<Option<MediaRef>> {
    if results.is_empty() {
        output.warn("No results found");
        return Ok(None);
    }

    let index = match pick {
        Some(n) if n >= 1 && n <= results.len() => n - 1,
        Some(n) => return Err(eyre!("--pick {} is out of range (1-{})", n, results.len())),
        None if results.len() == 1 => 0,
        None if is_interactive() => {
            let labels: Vec<String> = results.iter().map(|r| r.display_title()).collect();
            match prompts::prompt_select("Add which result?", &labels)? {
                Some(index) => index,
                None => return Ok(None),
            }
        }
        None => return Err(eyre!("Multiple results; choose one with --pick <n>")),
    };
    Ok(Some(results.swap_remove(index)))
}

pub async fn run_search(kind: MediaKind, query: String, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let registry = SearchRegistry::from_config(&ctx.config)?;
    let results = search_with_spinner(&registry, kind, &query).await?;

    if output.is_human() {
        if results.is_empty() {
            output.warn("No results found");
        } else {
            output.println(render::items_table(&results).to_string());
        }
    } else {
        output.json(&serde_json::to_value(&results)?);
    }
    Ok(())
}
