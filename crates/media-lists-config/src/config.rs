use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub openlibrary: OpenLibraryConfig,
}

/// The REST service that owns list documents and accounts
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    /// Movie and TV search is disabled while this is empty
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_tmdb_url")]
    pub base_url: String,
    #[serde(default = "default_tmdb_image_url")]
    pub image_base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenLibraryConfig {
    #[serde(default = "default_openlibrary_url")]
    pub base_url: String,
    #[serde(default = "default_openlibrary_covers_url")]
    pub covers_base_url: String,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_tmdb_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_openlibrary_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_openlibrary_covers_url() -> String {
    "https://covers.openlibrary.org".to_string()
}

fn default_search_limit() -> u32 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_tmdb_url(),
            image_base_url: default_tmdb_image_url(),
        }
    }
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: default_openlibrary_url(),
            covers_base_url: default_openlibrary_covers_url(),
            limit: default_search_limit(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if present, otherwise fall back to defaults
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("backend.base_url cannot be empty"));
        }
        if self.backend.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("backend.request_timeout_secs must be greater than zero"));
        }
        if self.tmdb.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.base_url cannot be empty"));
        }
        if self.openlibrary.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("openlibrary.base_url cannot be empty"));
        }
        if self.openlibrary.limit == 0 {
            return Err(anyhow::anyhow!("openlibrary.limit must be greater than zero"));
        }
        Ok(())
    }

    pub fn is_tmdb_configured(&self) -> bool {
        !self.tmdb.api_key.trim().is_empty() && self.tmdb.api_key != "YOUR_API_KEY"
    }

    /// Set a value by dotted key, e.g. `backend.base_url`
    pub fn set_value(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "backend.base_url" => self.backend.base_url = value.trim_end_matches('/').to_string(),
            "backend.request_timeout_secs" => {
                self.backend.request_timeout_secs = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("request_timeout_secs must be a whole number of seconds"))?
            }
            "tmdb.api_key" => self.tmdb.api_key = value.to_string(),
            "tmdb.base_url" => self.tmdb.base_url = value.trim_end_matches('/').to_string(),
            "tmdb.image_base_url" => self.tmdb.image_base_url = value.trim_end_matches('/').to_string(),
            "openlibrary.base_url" => self.openlibrary.base_url = value.trim_end_matches('/').to_string(),
            "openlibrary.covers_base_url" => {
                self.openlibrary.covers_base_url = value.trim_end_matches('/').to_string()
            }
            "openlibrary.limit" => {
                self.openlibrary.limit = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("openlibrary.limit must be a whole number"))?
            }
            other => return Err(anyhow::anyhow!("Unknown configuration key: {}", other)),
        }
        self.validate()
    }
}
