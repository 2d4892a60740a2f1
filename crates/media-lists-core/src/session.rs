use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use media_lists_config::CredentialStore;
use media_lists_sources::BackendClient;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};

/// Claims read from the token payload. The signature is never checked here;
/// the server remains the authority on validity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    sub: Option<serde_json::Value>,
    #[serde(default)]
    identity: Option<serde_json::Value>,
    #[serde(default)]
    exp: Option<i64>,
}

impl TokenClaims {
    pub fn username(&self) -> Option<String> {
        self.sub
            .as_ref()
            .or(self.identity.as_ref())
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|at| at <= now).unwrap_or(false)
    }
}

/// Decode the payload segment of a JWT; malformed tokens give `None`
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Signed-in state kept in the credential store between runs
pub struct Session {
    credentials: CredentialStore,
}

impl Session {
    pub fn load(path: PathBuf) -> Result<Self> {
        let mut credentials = CredentialStore::new(path);
        credentials.load()?;
        Ok(Self { credentials })
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.get_auth_token().map(|s| s.as_str())
    }

    pub fn email(&self) -> Option<&str> {
        self.credentials.get_auth_email().map(|s| s.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn claims(&self) -> Option<TokenClaims> {
        self.token().and_then(decode_claims)
    }

    /// Username carried in the stored token
    pub fn username(&self) -> Option<String> {
        self.claims().and_then(|c| c.username())
    }

    /// Token for requests; expired tokens are still sent and left for the server to reject
    pub fn require_token(&self) -> Result<&str> {
        let token = self.token().ok_or(CoreError::NotLoggedIn)?;
        if self.claims().map(|c| c.is_expired(Utc::now())).unwrap_or(false) {
            warn!("Stored session token has expired; run `shelf login` again if requests fail");
        }
        Ok(token)
    }

    /// Attach the stored token to a client
    pub fn authorize(&self, client: BackendClient) -> BackendClient {
        client.with_token(self.token().map(|t| t.to_string()))
    }

    pub async fn login(&mut self, client: &mut BackendClient, email: &str, password: &str) -> Result<Option<String>> {
        let response = client.login(email.trim(), password).await?;
        debug!("Login response: {}", response.message);

        self.credentials.set_auth_token(response.token);
        self.credentials.set_auth_email(email.trim().to_string());
        self.credentials.save()?;

        let username = self.username();
        info!("Signed in as {}", username.as_deref().unwrap_or(email));
        Ok(username)
    }

    /// Forget the stored token; returns whether one was present
    pub fn logout(&mut self) -> Result<bool> {
        let had_session = self.is_logged_in();
        self.credentials.clear_session();
        self.credentials.save()?;
        if had_session {
            info!("Signed out");
        }
        Ok(had_session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn token_with(payload: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.signature", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_decode_claims_sub() {
        let claims = decode_claims(&token_with(r#"{"sub":"alice","exp":1700000000}"#)).unwrap();
        assert_eq!(claims.username().as_deref(), Some("alice"));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_000_000);
        assert!(claims.is_expired(Utc::now()));
    }

    #[test]
    fn test_decode_claims_identity_fallback() {
        let claims = decode_claims(&token_with(r#"{"identity":"bob"}"#)).unwrap();
        assert_eq!(claims.username().as_deref(), Some("bob"));
        assert!(!claims.is_expired(Utc::now()));
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(decode_claims("not-a-jwt").is_none());
        assert!(decode_claims("a.!!!.c").is_none());
        assert!(decode_claims(&token_with("not json")).is_none());
        let numeric = decode_claims(&token_with(r#"{"sub":42}"#)).unwrap();
        assert_eq!(numeric.username(), None);
    }

    #[test]
    fn test_session_persists_and_logs_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.toml");

        let mut creds = CredentialStore::new(path.clone());
        creds.set_auth_token(token_with(r#"{"sub":"alice"}"#));
        creds.set_auth_email("alice@example.com".to_string());
        creds.save().unwrap();

        let mut session = Session::load(path.clone()).unwrap();
        assert!(session.is_logged_in());
        assert_eq!(session.username().as_deref(), Some("alice"));
        assert_eq!(session.email(), Some("alice@example.com"));
        assert!(session.require_token().is_ok());

        assert!(session.logout().unwrap());
        assert!(!session.logout().unwrap());

        let reloaded = Session::load(path).unwrap();
        assert!(!reloaded.is_logged_in());
        assert!(matches!(reloaded.require_token(), Err(CoreError::NotLoggedIn)));
    }
}
