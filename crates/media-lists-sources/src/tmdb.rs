use async_trait::async_trait;
use media_lists_config::TmdbConfig;
use media_lists_models::{MediaKind, MediaRef, PLACEHOLDER_IMAGE};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::SourceError;
use crate::http::{decode_json, ensure_success};
use crate::traits::MediaSearch;

const TMDB_KINDS: [MediaKind; 2] = [MediaKind::Movie, MediaKind::Tv];

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbResult {
    id: u64,
    // Movies carry title/release_date, shows carry name/first_air_date
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
}

/// Movie and TV search against The Movie Database
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    image_base_url: String,
}

impl TmdbClient {
    pub fn new(client: Arc<Client>, config: &TmdbConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_path(kind: MediaKind) -> Result<&'static str, SourceError> {
        match kind {
            MediaKind::Movie => Ok("search/movie"),
            MediaKind::Tv => Ok("search/tv"),
            MediaKind::Book => Err(SourceError::Unsupported("TMDB does not search books".to_string())),
        }
    }
}

/// "1995-12-15" → 1995; blank or malformed dates have no year
fn year_from_date(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

fn to_media_ref(result: TmdbResult, kind: MediaKind, image_base_url: &str) -> MediaRef {
    let (title, date) = match kind {
        MediaKind::Tv => (result.name.or(result.title), result.first_air_date),
        _ => (result.title.or(result.name), result.release_date),
    };

    let image = match result.poster_path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}{}", image_base_url, path),
        None => PLACEHOLDER_IMAGE.to_string(),
    };

    MediaRef::new(format!("{}-{}", kind.as_str(), result.id), title.unwrap_or_default(), kind)
        .with_year(year_from_date(date.as_deref()))
        .with_image(image)
}

#[async_trait]
impl MediaSearch for TmdbClient {
    fn provider_name(&self) -> &str {
        "tmdb"
    }

    fn kinds(&self) -> &[MediaKind] {
        &TMDB_KINDS
    }

    async fn search(&self, kind: MediaKind, query: &str) -> Result<Vec<MediaRef>, SourceError> {
        let path = Self::search_path(kind)?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
            .header("Accept", "application/json")
            .send()
            .await?;

        let context = format!("TMDB {} search", kind);
        let response = ensure_success(response, &context).await?;
        let body: TmdbSearchResponse = decode_json(response, &context).await?;
        debug!("TMDB {} search for '{}' returned {} results", kind, query, body.results.len());

        Ok(body
            .results
            .into_iter()
            .map(|result| to_media_ref(result, kind, &self.image_base_url))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    #[test]
    fn test_movie_result_mapping() {
        let body: TmdbSearchResponse = serde_json::from_str(
            r#"{"page":1,"results":[
                {"id":949,"title":"Heat","release_date":"1995-12-15","poster_path":"/heat.jpg"},
                {"id":12,"title":"Untitled","release_date":"","poster_path":null}
            ]}"#,
        )
        .unwrap();

        let refs: Vec<MediaRef> = body
            .results
            .into_iter()
            .map(|r| to_media_ref(r, MediaKind::Movie, IMAGE_BASE))
            .collect();

        assert_eq!(refs[0].id, "movie-949");
        assert_eq!(refs[0].title, "Heat");
        assert_eq!(refs[0].year, Some(1995));
        assert_eq!(refs[0].image.as_deref(), Some("https://image.tmdb.org/t/p/w500/heat.jpg"));
        assert_eq!(refs[1].year, None);
        assert_eq!(refs[1].image.as_deref(), Some(PLACEHOLDER_IMAGE));
    }

    #[test]
    fn test_tv_result_uses_name_and_air_date() {
        let result: TmdbResult = serde_json::from_str(
            r#"{"id":1396,"name":"Breaking Bad","first_air_date":"2008-01-20","poster_path":"/bb.jpg"}"#,
        )
        .unwrap();
        let item = to_media_ref(result, MediaKind::Tv, IMAGE_BASE);
        assert_eq!(item.id, "tv-1396");
        assert_eq!(item.title, "Breaking Bad");
        assert_eq!(item.kind, MediaKind::Tv);
        assert_eq!(item.year, Some(2008));
    }

    #[test]
    fn test_missing_results_field() {
        let body: TmdbSearchResponse = serde_json::from_str(r#"{"status_code":7}"#).unwrap();
        assert!(body.results.is_empty());
    }

    #[test]
    fn test_books_unsupported() {
        assert!(TmdbClient::search_path(MediaKind::Book).is_err());
        assert_eq!(TmdbClient::search_path(MediaKind::Tv).unwrap(), "search/tv");
    }
}
