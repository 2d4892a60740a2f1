use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

const AUTH_TOKEN_KEY: &str = "auth_token";
const AUTH_EMAIL_KEY: &str = "auth_email";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// TOML-backed key/value store for the session token and related secrets
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_auth_token(&self) -> Option<&String> {
        self.get(AUTH_TOKEN_KEY)
    }

    pub fn set_auth_token(&mut self, token: String) {
        self.set(AUTH_TOKEN_KEY.to_string(), token);
    }

    pub fn get_auth_email(&self) -> Option<&String> {
        self.get(AUTH_EMAIL_KEY)
    }

    pub fn set_auth_email(&mut self, email: String) {
        self.set(AUTH_EMAIL_KEY.to_string(), email);
    }

    /// Drop everything tied to the current session
    pub fn clear_session(&mut self) {
        self.remove(AUTH_TOKEN_KEY);
        self.remove(AUTH_EMAIL_KEY);
    }
}
