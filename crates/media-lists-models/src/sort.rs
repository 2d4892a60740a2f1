use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a collection of lists is ordered for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortMethod {
    /// Newest created first, direction ignored
    #[default]
    Default,
    Alphabetical,
    /// By creation date
    Date,
    /// By last update, falling back to creation date
    Recent,
    /// By item count
    Popularity,
    /// By the client-local manual order
    Manual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMethod::Default => "default",
            SortMethod::Alphabetical => "alphabetical",
            SortMethod::Date => "date",
            SortMethod::Recent => "recent",
            SortMethod::Popularity => "popularity",
            SortMethod::Manual => "manual",
        }
    }

    /// Whether re-selecting this method flips the direction
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            SortMethod::Alphabetical | SortMethod::Date | SortMethod::Recent | SortMethod::Popularity
        )
    }

    /// Direction applied when switching to this method: A to Z, otherwise newest/most first
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortMethod::Alphabetical => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn label(&self, direction: SortDirection) -> String {
        let asc = direction == SortDirection::Asc;
        match self {
            SortMethod::Default => "Default".to_string(),
            SortMethod::Alphabetical => format!("Alphabetical {}", if asc { "(A to Z)" } else { "(Z to A)" }),
            SortMethod::Date | SortMethod::Recent => {
                format!("Date Added {}", if asc { "(Oldest first)" } else { "(Newest first)" })
            }
            SortMethod::Popularity => {
                format!("Popularity {}", if asc { "(Fewest items first)" } else { "(Most items first)" })
            }
            SortMethod::Manual => "Manual Order".to_string(),
        }
    }
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(SortMethod::Default),
            "alphabetical" | "alpha" | "name" => Ok(SortMethod::Alphabetical),
            "date" | "created" => Ok(SortMethod::Date),
            "recent" | "updated" => Ok(SortMethod::Recent),
            "popularity" | "items" => Ok(SortMethod::Popularity),
            "manual" => Ok(SortMethod::Manual),
            other => Err(format!(
                "Invalid sort method: {}. Use 'default', 'alphabetical', 'date', 'recent', 'popularity', or 'manual'",
                other
            )),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("Invalid sort direction: {}. Use 'asc' or 'desc'", other)),
        }
    }
}
