use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Keyword array an overlap filter is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordField {
    Tags,
    Objects,
    Colors,
}

impl KeywordField {
    pub fn column(self) -> &'static str {
        match self {
            KeywordField::Tags => "tags",
            KeywordField::Objects => "detected_objects",
            KeywordField::Colors => "dominant_colors",
        }
    }
}

impl fmt::Display for KeywordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// How the search endpoint interprets a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Relevance ranking over every field.
    #[default]
    All,
    /// Relevance ranking restricted to records whose text holds the query.
    Text,
    Objects,
    Colors,
    Tags,
}

impl SearchMode {
    /// The keyword field used by overlap modes.
    pub fn overlap_field(self) -> Option<KeywordField> {
        match self {
            SearchMode::Objects => Some(KeywordField::Objects),
            SearchMode::Colors => Some(KeywordField::Colors),
            SearchMode::Tags => Some(KeywordField::Tags),
            SearchMode::All | SearchMode::Text => None,
        }
    }
}

impl FromStr for SearchMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(SearchMode::All),
            "text" => Ok(SearchMode::Text),
            "objects" => Ok(SearchMode::Objects),
            "colors" => Ok(SearchMode::Colors),
            "tags" => Ok(SearchMode::Tags),
            other => Err(AppError::BadRequest(format!("Unknown search mode: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_mode_parses_known_values() {
        assert_eq!("".parse::<SearchMode>().unwrap(), SearchMode::All);
        assert_eq!("Colors".parse::<SearchMode>().unwrap(), SearchMode::Colors);
        assert!(matches!("fuzzy".parse::<SearchMode>(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn overlap_modes_map_to_columns() {
        assert_eq!(SearchMode::Objects.overlap_field().map(KeywordField::column), Some("detected_objects"));
        assert_eq!(SearchMode::Text.overlap_field(), None);
    }
}
