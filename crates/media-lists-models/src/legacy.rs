use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::list::NewList;
use crate::media::MediaRef;

/// A list from the local-only storage that predates server-side lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegacyList {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<MediaRef>,
    #[serde(
        rename = "createdAt",
        default,
        with = "crate::timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl LegacyList {
    /// Server payload for this list; a missing description becomes ""
    pub fn to_new_list(&self) -> NewList {
        NewList {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            items: self.items.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_new_list_defaults_description() {
        let legacy: LegacyList = serde_json::from_str(
            r#"{"id":"1712","name":"Summer","items":[{"id":"book-OL1W","title":"Dune","type":"book"}],"createdAt":"2023-06-01T12:00:00.000Z"}"#,
        )
        .unwrap();
        let payload = legacy.to_new_list();
        assert_eq!(payload.name, "Summer");
        assert_eq!(payload.description, "");
        assert_eq!(payload.items.len(), 1);
        assert!(legacy.created_at.is_some());
    }
}
