//! Registry of catalogue search providers keyed by media kind.

use media_lists_config::Config;
use media_lists_models::{MediaKind, MediaRef};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::http::create_http_client;
use crate::openlibrary::OpenLibraryClient;
use crate::tmdb::TmdbClient;
use crate::traits::MediaSearch;

pub struct SearchRegistry {
    providers: HashMap<MediaKind, Arc<dyn MediaSearch>>,
}

impl SearchRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Build the built-in providers. TMDB is only registered once an API key is set.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = Arc::new(create_http_client(Duration::from_secs(
            config.backend.request_timeout_secs,
        ))?);
        let mut registry = Self::new();

        if config.is_tmdb_configured() {
            registry.register(Arc::new(TmdbClient::new(client.clone(), &config.tmdb)));
        } else {
            warn!("TMDB API key not configured; movie and TV search disabled");
        }
        registry.register(Arc::new(OpenLibraryClient::new(client, &config.openlibrary)));

        Ok(registry)
    }

    /// Register a provider for every kind it supports, replacing earlier ones
    pub fn register(&mut self, provider: Arc<dyn MediaSearch>) {
        for kind in provider.kinds() {
            debug!("Registering {} for {} search", provider.provider_name(), kind);
            self.providers.insert(*kind, provider.clone());
        }
    }

    pub fn provider_for(&self, kind: MediaKind) -> Option<&Arc<dyn MediaSearch>> {
        self.providers.get(&kind)
    }

    pub fn is_supported(&self, kind: MediaKind) -> bool {
        self.providers.contains_key(&kind)
    }

    pub fn supported_kinds(&self) -> Vec<MediaKind> {
        let mut kinds: Vec<MediaKind> = self.providers.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }

    pub async fn search(&self, kind: MediaKind, query: &str) -> Result<Vec<MediaRef>, SourceError> {
        match self.providers.get(&kind) {
            Some(provider) => provider.search(kind, query).await,
            None => Err(SourceError::Unsupported(format!("No search provider configured for {}", kind))),
        }
    }
}

impl Default for SearchRegistry {
    fn default() -> Self {
        Self::new()
    }
}
