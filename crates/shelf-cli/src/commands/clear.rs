use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_lists_config::{PathManager, SettingsStore};
use std::fs;

use crate::output::Output;

pub fn run_clear(all: bool, settings: bool, credentials: bool, logs: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();

    if !(all || settings || credentials || logs) {
        output.warn("No clear option specified. Use --settings, --credentials, --logs, or --all");
        output.println("\nExample: shelf clear --settings");
        return Ok(());
    }

    if all || settings {
        clear_settings(&paths, output)?;
    }
    if all || credentials {
        clear_credentials(&paths, output)?;
    }
    if all || logs {
        clear_logs(&paths, output)?;
    }
    Ok(())
}

/// Sort preferences, manual order and any unmigrated local lists
fn clear_settings(paths: &PathManager, output: &Output) -> Result<()> {
    let store = SettingsStore::new(paths.settings_file());
    let pending = store.load().legacy_lists.len();
    if pending > 0 {
        output.warn(format!("Discarding {} local list(s) that were never migrated", pending));
    }

    let removed = store
        .clear()
        .map_err(|e| eyre!("Failed to remove settings at {}: {}", store.path().display(), e))?;
    if removed {
        output.success(format!("Cleared local settings: {}", store.path().display()));
    } else {
        output.info("No local settings found to clear");
    }
    Ok(())
}

fn clear_credentials(paths: &PathManager, output: &Output) -> Result<()> {
    let credentials_file = paths.credentials_file();
    if credentials_file.exists() {
        fs::remove_file(&credentials_file)
            .map_err(|e| eyre!("Failed to remove credentials at {}: {}", credentials_file.display(), e))?;
        output.success(format!("Cleared credentials: {}", credentials_file.display()));
    } else {
        output.info("No credentials file found to clear");
    }
    Ok(())
}

fn clear_logs(paths: &PathManager, output: &Output) -> Result<()> {
    let log_dir = paths.log_dir();
    if log_dir.exists() {
        fs::remove_dir_all(log_dir).map_err(|e| eyre!("Failed to remove logs at {}: {}", log_dir.display(), e))?;
        output.success(format!("Cleared logs: {}", log_dir.display()));
    } else {
        output.info("No logs found to clear");
    }
    Ok(())
}
