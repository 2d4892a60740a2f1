use async_trait::async_trait;
use media_lists_config::BackendConfig;
use media_lists_models::{ListScope, LoginResponse, MediaList, NewList, TokenStatus, UserProfile};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::backend::api;
use crate::error::SourceError;
use crate::http::create_http_client;
use crate::traits::ListStore;

/// HTTP client for the list and account service
#[derive(Clone)]
pub struct BackendClient {
    client: Arc<Client>,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let base_url: String = base_url.into();
        Ok(Self {
            client: Arc::new(create_http_client(timeout)?),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, SourceError> {
        Self::new(config.base_url.clone(), Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Exchange credentials for a bearer token and keep it on this client
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, SourceError> {
        let response = api::login(&self.client, &self.base_url, email, password).await?;
        self.token = Some(response.token.clone());
        info!("Logged in to {}", self.base_url);
        Ok(response)
    }

    /// Server-side check of the current token; 401 counts as invalid
    pub async fn verify_token(&self) -> Result<TokenStatus, SourceError> {
        let token = self.token().ok_or(SourceError::NotAuthenticated)?;
        match api::verify_token(&self.client, &self.base_url, token).await {
            Err(SourceError::Unauthorized(_)) => Ok(TokenStatus { valid: false, user: None }),
            other => other,
        }
    }
}

#[async_trait]
impl ListStore for BackendClient {
    async fn get_lists(&self, scope: ListScope) -> Result<Vec<MediaList>, SourceError> {
        api::get_lists(&self.client, &self.base_url, self.token(), scope).await
    }

    async fn get_list(&self, id: &str) -> Result<MediaList, SourceError> {
        api::get_list(&self.client, &self.base_url, self.token(), id).await
    }

    async fn create_list(&self, list: &NewList) -> Result<MediaList, SourceError> {
        let created = api::create_list(&self.client, &self.base_url, self.token(), list).await?;
        info!("Created list {} ({})", created.name, created.id);
        Ok(created)
    }

    async fn update_list(&self, list: &MediaList) -> Result<MediaList, SourceError> {
        let updated = api::update_list(&self.client, &self.base_url, self.token(), list).await?;
        info!("Saved list {} ({} items)", updated.id, updated.items.len());
        Ok(updated)
    }

    async fn delete_list(&self, id: &str) -> Result<(), SourceError> {
        api::delete_list(&self.client, &self.base_url, self.token(), id).await?;
        info!("Deleted list {}", id);
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<UserProfile>, SourceError> {
        api::get_user(&self.client, &self.base_url, username).await
    }
}
