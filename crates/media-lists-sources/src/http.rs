use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::SourceError;

/// Shared reqwest client with a request timeout so a hung server fails the call
pub fn create_http_client(timeout: Duration) -> Result<Client, SourceError> {
    Client::builder()
        .user_agent(concat!("shelf/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(SourceError::from)
}

/// Turn a non-2xx response into a categorized error
pub async fn ensure_success(response: Response, context: &str) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("{} failed with {}: {}", context, status, body);
    Err(status_error(context, status.as_u16(), &body))
}

pub fn status_error(context: &str, status: u16, body: &str) -> SourceError {
    let message = extract_error_message(body);
    match status {
        401 | 403 => SourceError::Unauthorized(format!("{}: {}", context, message)),
        404 => SourceError::NotFound(format!("{}: {}", context, message)),
        _ => SourceError::Status {
            context: context.to_string(),
            status,
            message,
        },
    }
}

/// The backend answers errors as `{"error": "..."}` (or `{"msg": "..."}` from the JWT layer)
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .or_else(|| json.get("msg"))
                .or_else(|| json.get("message"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string())
}

pub async fn decode_json<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, SourceError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode(format!("{}: {}", context, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message() {
        assert_eq!(extract_error_message(r#"{"error": "List not found"}"#), "List not found");
        assert_eq!(extract_error_message(r#"{"msg": "Token has expired"}"#), "Token has expired");
        assert_eq!(extract_error_message("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(extract_error_message(""), "");
    }

    #[test]
    fn test_status_error_categories() {
        assert!(status_error("Fetch lists", 401, "").is_auth());
        assert!(status_error("Fetch list", 404, r#"{"error":"List not found"}"#).is_not_found());
        match status_error("Create list", 400, r#"{"error":"List name is required"}"#) {
            SourceError::Status { status, message, .. } => {
                assert_eq!(status, 400);
                assert_eq!(message, "List name is required");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_create_http_client() {
        assert!(create_http_client(Duration::from_secs(5)).is_ok());
    }
}
