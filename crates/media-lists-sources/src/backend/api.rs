use media_lists_models::{ListScope, LoginResponse, MediaList, NewList, TokenStatus, UserProfile};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::http::{decode_json, ensure_success};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Endpoint that serves the lists of a scope
pub fn lists_url(base_url: &str, scope: ListScope) -> String {
    match scope {
        ListScope::Owned => format!("{}/api/lists", base_url),
        ListScope::Public => format!("{}/api/public-lists", base_url),
        ListScope::Followed => format!("{}/api/users/followed-lists", base_url),
    }
}

pub fn list_url(base_url: &str, id: &str) -> String {
    format!("{}/api/lists/{}", base_url, urlencoding::encode(id))
}

pub fn user_url(base_url: &str, username: &str) -> String {
    format!("{}/api/users/{}", base_url, urlencoding::encode(username))
}

/// Public lists are readable without a session; everything else needs one
pub fn scope_requires_auth(scope: ListScope) -> bool {
    !matches!(scope, ListScope::Public)
}

fn with_json_headers(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    let request = request
        .header("Accept", "application/json")
        .header("Content-Type", "application/json");
    match token {
        Some(token) => request.header("Authorization", format!("Bearer {}", token)),
        None => request,
    }
}

fn require_token(token: Option<&str>) -> Result<&str, SourceError> {
    token.ok_or(SourceError::NotAuthenticated)
}

pub async fn login(client: &Client, base_url: &str, email: &str, password: &str) -> Result<LoginResponse, SourceError> {
    let url = format!("{}/api/auth/login", base_url);
    let response = with_json_headers(client.post(&url), None)
        .json(&LoginRequest { email, password })
        .send()
        .await?;

    let response = ensure_success(response, "Login").await?;
    decode_json(response, "Login").await
}

/// Ask the server whether a token is still accepted
pub async fn verify_token(client: &Client, base_url: &str, token: &str) -> Result<TokenStatus, SourceError> {
    let url = format!("{}/api/auth/verify-token", base_url);
    let response = with_json_headers(client.get(&url), Some(token)).send().await?;
    let response = ensure_success(response, "Token verification").await?;
    decode_json(response, "Token verification").await
}

pub async fn get_lists(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    scope: ListScope,
) -> Result<Vec<MediaList>, SourceError> {
    let token = if scope_requires_auth(scope) {
        Some(require_token(token)?)
    } else {
        token
    };

    let url = lists_url(base_url, scope);
    debug!("Fetching {} lists from {}", scope, url);
    let response = with_json_headers(client.get(&url), token).send().await?;
    let response = ensure_success(response, "Failed to fetch lists").await?;
    let lists: Vec<MediaList> = decode_json(response, "Failed to fetch lists").await?;
    debug!("Fetched {} {} lists", lists.len(), scope);
    Ok(lists)
}

pub async fn get_list(client: &Client, base_url: &str, token: Option<&str>, id: &str) -> Result<MediaList, SourceError> {
    let response = with_json_headers(client.get(list_url(base_url, id)), token).send().await?;
    let context = format!("Failed to fetch list {}", id);
    let response = ensure_success(response, &context).await?;
    decode_json(response, &context).await
}

pub async fn create_list(client: &Client, base_url: &str, token: Option<&str>, list: &NewList) -> Result<MediaList, SourceError> {
    let token = require_token(token)?;
    let response = with_json_headers(client.post(lists_url(base_url, ListScope::Owned)), Some(token))
        .json(list)
        .send()
        .await?;
    let response = ensure_success(response, "Failed to create list").await?;
    decode_json(response, "Failed to create list").await
}

/// Replace the whole document on the server
pub async fn update_list(client: &Client, base_url: &str, token: Option<&str>, list: &MediaList) -> Result<MediaList, SourceError> {
    let token = require_token(token)?;
    let response = with_json_headers(client.put(list_url(base_url, &list.id)), Some(token))
        .json(list)
        .send()
        .await?;
    let context = format!("Failed to update list {}", list.id);
    let response = ensure_success(response, &context).await?;
    decode_json(response, &context).await
}

pub async fn delete_list(client: &Client, base_url: &str, token: Option<&str>, id: &str) -> Result<(), SourceError> {
    let token = require_token(token)?;
    let response = with_json_headers(client.delete(list_url(base_url, id)), Some(token))
        .send()
        .await?;
    ensure_success(response, &format!("Failed to delete list {}", id)).await?;
    Ok(())
}

/// Look a user up by name. Any non-success status counts as "no such user".
pub async fn get_user(client: &Client, base_url: &str, username: &str) -> Result<Option<UserProfile>, SourceError> {
    let response = with_json_headers(client.get(user_url(base_url, username)), None)
        .send()
        .await?;

    if !response.status().is_success() {
        debug!("User lookup for {} returned {}", username, response.status());
        return Ok(None);
    }

    match decode_json::<UserProfile>(response, "User lookup").await {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            warn!("Treating undecodable user record for {} as missing: {}", username, e);
            Ok(None)
        }
    }
}
