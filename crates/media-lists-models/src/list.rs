use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::media::MediaRef;

/// A user-curated ordered collection of media references.
///
/// Field names follow the backend documents (`_id`, `user_id`, `created_at`),
/// with aliases for the camelCase shape older clients wrote. `items` order is
/// the display order; duplicates are allowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaList {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<MediaRef>,
    #[serde(rename = "isPublic", alias = "is_public", default)]
    pub is_public: bool,
    #[serde(rename = "isCollaborative", alias = "is_collaborative", default)]
    pub is_collaborative: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub collaborators: Vec<String>,
    #[serde(rename = "user_id", alias = "owner", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(
        default,
        alias = "createdAt",
        with = "crate::timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "updatedAt",
        with = "crate::timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MediaList {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Owners and listed collaborators may write the list
    pub fn is_editable_by(&self, username: &str) -> bool {
        self.owner.as_deref() == Some(username) || self.collaborators.iter().any(|c| c == username)
    }

    /// Case-insensitive substring match on name or description
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }

    /// Creation time, with missing dates treated as the epoch
    pub fn created_or_epoch(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Last update, falling back to creation, then the epoch
    pub fn touched_or_epoch(&self) -> DateTime<Utc> {
        self.updated_at.or(self.created_at).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Payload for creating a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewList {
    pub name: String,
    pub description: String,
    pub items: Vec<MediaRef>,
}

impl NewList {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            items: Vec::new(),
        }
    }

    /// Copy of an existing list named "<name> (Copy)"
    pub fn duplicate_of(list: &MediaList) -> Self {
        Self {
            name: format!("{} (Copy)", list.name),
            description: list.description.clone(),
            items: list.items.clone(),
        }
    }
}

/// Which collection of lists a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListScope {
    #[default]
    Owned,
    Public,
    Followed,
}

impl ListScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListScope::Owned => "owned",
            ListScope::Public => "public",
            ListScope::Followed => "followed",
        }
    }
}

impl fmt::Display for ListScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owned" | "mine" | "own" => Ok(ListScope::Owned),
            "public" => Ok(ListScope::Public),
            "followed" | "following" => Ok(ListScope::Followed),
            other => Err(format!("Invalid scope: {}. Use 'owned', 'public', or 'followed'", other)),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

    const BACKEND_LIST: &str = r#"{
        "_id": "65a1",
        "name": "Heist films",
        "description": null,
        "items": [
            {"id": "movie-949", "title": "Heat", "type": "movie", "year": 1995, "image": "https://image.tmdb.org/t/p/w500/heat.jpg"},
            {"id": "movie-949", "title": "Heat", "type": "movie", "year": ""}
        ],
        "user_id": "ana",
        "created_at": "Mon, 01 Jan 2024 10:00:00 GMT",
        "updated_at": "Tue, 02 Jan 2024 10:00:00 GMT"
    }"#;

    #[test]
    fn test_deserialize_backend_document() {
        let list: MediaList = serde_json::from_str(BACKEND_LIST).unwrap();
        assert_eq!(list.id, "65a1");
        assert_eq!(list.description, "");
        assert_eq!(list.item_count(), 2);
        assert_eq!(list.items[0].kind, MediaKind::Movie);
        assert_eq!(list.items[1].year, None);
        assert_eq!(list.owner.as_deref(), Some("ana"));
        assert!(list.created_at.is_some());
        assert!(!list.is_public);
        assert!(list.collaborators.is_empty());
    }

    #[test]
    fn test_document_round_trip_is_stable() {
        let list: MediaList = serde_json::from_str(BACKEND_LIST).unwrap();
        let written = serde_json::to_string(&list).unwrap();
        let reread: MediaList = serde_json::from_str(&written).unwrap();
        assert_eq!(list, reread);
    }

    #[test]
    fn test_camel_case_aliases() {
        let list: MediaList = serde_json::from_str(
            r#"{"id":"a","name":"A","isPublic":true,"is_collaborative":true,"owner":"bo","collaborators":["cy"],"createdAt":"2024-03-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(list.is_public);
        assert!(list.is_collaborative);
        assert!(list.is_editable_by("bo"));
        assert!(list.is_editable_by("cy"));
        assert!(!list.is_editable_by("dee"));
    }

    #[test]
    fn test_missing_dates_fall_back_to_epoch() {
        let list: MediaList = serde_json::from_str(r#"{"_id":"a","name":"A","created_at":"garbage"}"#).unwrap();
        assert_eq!(list.created_at, None);
        assert_eq!(list.created_or_epoch(), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(list.touched_or_epoch(), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_matches_name_or_description() {
        let mut list: MediaList = serde_json::from_str(r#"{"_id":"a","name":"Noir Classics"}"#).unwrap();
        list.description = "Rainy streets".to_string();
        assert!(list.matches("noir"));
        assert!(list.matches("RAINY"));
        assert!(list.matches("  "));
        assert!(!list.matches("western"));
    }

    #[test]
    fn test_duplicate_of() {
        let list: MediaList = serde_json::from_str(BACKEND_LIST).unwrap();
        let copy = NewList::duplicate_of(&list);
        assert_eq!(copy.name, "Heist films (Copy)");
        assert_eq!(copy.items, list.items);
    }
}
