use async_trait::async_trait;
use media_lists_config::OpenLibraryConfig;
use media_lists_models::{MediaKind, MediaRef, PLACEHOLDER_IMAGE};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::SourceError;
use crate::http::{decode_json, ensure_success};
use crate::traits::MediaSearch;

const OPENLIBRARY_KINDS: [MediaKind; 1] = [MediaKind::Book];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<BookDoc>,
}

#[derive(Debug, Deserialize)]
struct BookDoc {
    key: String,
    #[serde(default)]
    title: String,
    first_publish_year: Option<i32>,
    cover_i: Option<i64>,
}

/// Book search against Open Library
#[derive(Clone)]
pub struct OpenLibraryClient {
    client: Arc<Client>,
    base_url: String,
    covers_base_url: String,
    limit: u32,
}

impl OpenLibraryClient {
    pub fn new(client: Arc<Client>, config: &OpenLibraryConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            covers_base_url: config.covers_base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
        }
    }
}

fn to_media_ref(doc: BookDoc, covers_base_url: &str) -> MediaRef {
    let work_id = doc.key.trim_start_matches("/works/");
    let image = match doc.cover_i {
        Some(cover) => format!("{}/b/id/{}-M.jpg", covers_base_url, cover),
        None => PLACEHOLDER_IMAGE.to_string(),
    };

    MediaRef::new(format!("book-{}", work_id), doc.title, MediaKind::Book)
        .with_year(doc.first_publish_year)
        .with_image(image)
}

#[async_trait]
impl MediaSearch for OpenLibraryClient {
    fn provider_name(&self) -> &str {
        "openlibrary"
    }

    fn kinds(&self) -> &[MediaKind] {
        &OPENLIBRARY_KINDS
    }

    async fn search(&self, kind: MediaKind, query: &str) -> Result<Vec<MediaRef>, SourceError> {
        if kind != MediaKind::Book {
            return Err(SourceError::Unsupported(format!("Open Library does not search {}", kind)));
        }
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/search.json", self.base_url);
        let limit = self.limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("limit", limit.as_str())])
            .header("Accept", "application/json")
            .send()
            .await?;

        let response = ensure_success(response, "Open Library search").await?;
        let body: SearchResponse = decode_json(response, "Open Library search").await?;
        debug!("Open Library search for '{}' returned {} docs", query, body.docs.len());

        Ok(body
            .docs
            .into_iter()
            .map(|doc| to_media_ref(doc, &self.covers_base_url))
            .collect())
    }
}
