pub mod config;
pub mod credentials;
pub mod paths;
pub mod settings;

pub use config::{BackendConfig, Config, OpenLibraryConfig, TmdbConfig};
pub use credentials::CredentialStore;
pub use paths::{container_base_path, PathManager};
pub use settings::{ClientSettings, SettingsStore};
