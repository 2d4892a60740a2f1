use async_trait::async_trait;
use media_lists_models::{ListScope, MediaKind, MediaList, MediaRef, NewList, UserProfile};

use crate::error::SourceError;

/// Owner of the canonical list documents.
///
/// Writes are whole-document: `update_list` replaces everything the server
/// holds for that list, and the last writer wins.
#[async_trait]
pub trait ListStore: Send + Sync {
    async fn get_lists(&self, scope: ListScope) -> Result<Vec<MediaList>, SourceError>;
    async fn get_list(&self, id: &str) -> Result<MediaList, SourceError>;
    async fn create_list(&self, list: &NewList) -> Result<MediaList, SourceError>;
    async fn update_list(&self, list: &MediaList) -> Result<MediaList, SourceError>;
    async fn delete_list(&self, id: &str) -> Result<(), SourceError>;

    /// `Ok(None)` for any unsuccessful lookup, not just 404
    async fn find_user(&self, username: &str) -> Result<Option<UserProfile>, SourceError>;
}

/// A third-party catalogue that can be searched for items to add to a list
#[async_trait]
pub trait MediaSearch: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Media kinds this provider can search
    fn kinds(&self) -> &[MediaKind];

    /// An empty or blank query returns no results without a request
    async fn search(&self, kind: MediaKind, query: &str) -> Result<Vec<MediaRef>, SourceError>;
}
