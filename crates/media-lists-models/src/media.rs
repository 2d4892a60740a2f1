use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Image shown when a provider has no poster or cover for an item
pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/150/225";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
    Book,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
            MediaKind::Book => "book",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv" | "show" | "shows" => Ok(MediaKind::Tv),
            "book" | "books" => Ok(MediaKind::Book),
            other => Err(format!("Invalid media type: {}. Use 'movie', 'tv', or 'book'", other)),
        }
    }
}

/// Lightweight pointer to an external media item with display metadata.
///
/// `id` carries the provider prefix (`movie-603`, `tv-1396`, `book-OL45804W`).
/// Nothing is normalized across providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaRef {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_year", skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl MediaRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            image: None,
            year: None,
        }
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Title with the year appended when known, e.g. "Heat (1995)"
    pub fn display_title(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

// Older documents store the year as "" when the provider had no date
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<RawYear>::deserialize(deserializer)? {
        Some(RawYear::Number(n)) => i32::try_from(n).ok(),
        Some(RawYear::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
