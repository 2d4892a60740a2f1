use anyhow::{bail, Context, Result};
use media_lists_models::{LegacyList, SortDirection, SortMethod};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Client-local state that never reaches the server.
///
/// Keys keep the names the browser client used in local storage so exported
/// state can be dropped in as-is. No schema versioning.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClientSettings {
    #[serde(rename = "listsSortMethod", default)]
    pub sort_method: SortMethod,
    #[serde(rename = "listsSortDirection", default)]
    pub sort_direction: SortDirection,
    /// List IDs in manual display order; only consulted in manual sort mode
    #[serde(rename = "listsManualOrder", default)]
    pub manual_order: Vec<String>,
    /// Local-only lists waiting to be migrated to the server
    #[serde(rename = "lists", default)]
    pub legacy_lists: Vec<LegacyList>,
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the file as-is. A missing file yields defaults; an unreadable or
    /// unparsable one is an error.
    pub fn try_load(&self) -> Result<ClientSettings> {
        if !self.path.exists() {
            debug!("No settings file at {}, using defaults", self.path.display());
            return Ok(ClientSettings::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file {}", self.path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Settings file {} is not valid", self.path.display()))
    }

    /// Missing or corrupt files yield defaults; a corrupt file is left in place
    pub fn load(&self) -> ClientSettings {
        self.try_load().unwrap_or_else(|e| {
            warn!("{:#}. Using defaults.", e);
            ClientSettings::default()
        })
    }

    /// Write settings, unless the file on disk cannot be parsed. A corrupt file
    /// is only replaced through `clear`.
    pub fn save(&self, settings: &ClientSettings) -> Result<()> {
        if let Err(e) = self.try_load() {
            bail!(
                "Refusing to overwrite unreadable settings ({:#}). Fix the file or run `shelf clear --settings`.",
                e
            );
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        debug!(
            "Settings saved: sort={} {} ({} manual entries, {} legacy lists)",
            settings.sort_method,
            settings.sort_direction,
            settings.manual_order.len(),
            settings.legacy_lists.len()
        );
        Ok(())
    }

    pub fn clear(&self) -> Result<bool> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            return Ok(true);
        }
        Ok(false)
    }
}
