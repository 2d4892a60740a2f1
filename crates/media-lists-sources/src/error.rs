use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure: connection refused, timeout, TLS
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{context}: {status} - {message}")]
    Status {
        context: String,
        status: u16,
        message: String,
    },

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("not logged in; run `shelf login` first")]
    NotAuthenticated,

    #[error("{0}")]
    Unsupported(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, SourceError::Unauthorized(_) | SourceError::NotAuthenticated)
    }
}
