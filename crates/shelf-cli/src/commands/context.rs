use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use media_lists_config::{Config, PathManager, SettingsStore};
use media_lists_core::{ListCollection, Session};
use media_lists_models::{ListScope, MediaList};
use media_lists_sources::BackendClient;

use super::progress::Spinner;

/// Paths, configuration and session shared by every command
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub session: Session,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        let session = Session::load(paths.credentials_file()).wrap_err("Failed to load stored session")?;
        Ok(Self { paths, config, session })
    }

    /// Backend client carrying the stored token, if any
    pub fn client(&self) -> Result<BackendClient> {
        let client = BackendClient::from_config(&self.config.backend).wrap_err("Failed to create HTTP client")?;
        Ok(self.session.authorize(client))
    }

    pub fn settings(&self) -> SettingsStore {
        SettingsStore::new(self.paths.settings_file())
    }

    /// Signed-in username, decoded from the stored token
    pub fn username(&self) -> Option<String> {
        self.session.username()
    }

    pub fn require_login(&self) -> Result<()> {
        self.session.require_token()?;
        Ok(())
    }

    pub async fn collection(&self, scope: ListScope) -> Result<ListCollection<BackendClient>> {
        if scope != ListScope::Public {
            self.require_login()?;
        }
        let mut collection = ListCollection::new(self.client()?, self.settings(), scope);
        let spinner = Spinner::start(format!("Loading {} lists...", scope));
        collection.load().await?;
        spinner.finish();
        Ok(collection)
    }
}

/// Find a list by 1-based display position, id, or case-insensitive name.
pub fn resolve_list<'a>(displayed: &[&'a MediaList], key: &str) -> Result<&'a MediaList> {
    let key = key.trim();

    if let Ok(position) = key.parse::<usize>() {
        if position >= 1 && position <= displayed.len() {
            return Ok(displayed[position - 1]);
        }
    }

    if let Some(list) = displayed.iter().copied().find(|l| l.id == key) {
        return Ok(list);
    }

    let by_name: Vec<&MediaList> = displayed
        .iter()
        .copied()
        .filter(|l| l.name.eq_ignore_ascii_case(key))
        .collect();
    match by_name.as_slice() {
        [one] => Ok(*one),
        [] => Err(eyre!("No list matches '{}'", key)),
        many => Err(eyre!(
            "'{}' matches {} lists; use the list id or its position instead",
            key,
            many.len()
        )),
    }
}
