//! Query validation.

use std::fmt;

/// Minimum query length, in characters.
pub const MIN_QUERY_CHARS: usize = 3;

/// Maximum query length, in characters.
pub const MAX_QUERY_CHARS: usize = 20;

/// Maximum number of whitespace-separated words in a query.
pub const MAX_QUERY_WORDS: usize = 2;

/// Reasons a raw query is rejected before any lookup.
///
/// Rules are checked in declaration order; the first violation wins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("query is required")]
    Missing,

    #[error("Length of query should be between 3 to 20 letters")]
    Length { chars: usize },

    /// Also returned for a query with no words at all (whitespace only).
    #[error("query should not exceeds 2 words long")]
    TooManyWords { words: usize },
}

/// A validated city query.
///
/// Holds the query as the caller typed it plus its lowercase form, which is
/// the key used for prefix search and exact-match comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    raw: String,
    lowercase: String,
}

impl CityQuery {
    /// Validate a raw query.
    ///
    /// A missing or empty query fails with [`ValidationError::Missing`].
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let raw = match raw {
            Some(q) if !q.is_empty() => q,
            _ => return Err(ValidationError::Missing),
        };

        let chars = raw.chars().count();
        if !(MIN_QUERY_CHARS..=MAX_QUERY_CHARS).contains(&chars) {
            return Err(ValidationError::Length { chars });
        }

        let words = raw.split_whitespace().count();
        if words == 0 || words > MAX_QUERY_WORDS {
            return Err(ValidationError::TooManyWords { words });
        }

        Ok(Self {
            raw: raw.to_string(),
            lowercase: raw.to_lowercase(),
        })
    }

    /// The query as received.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercase form used as the search key.
    pub fn lowercase(&self) -> &str {
        &self.lowercase
    }
}

impl fmt::Display for CityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for CityQuery {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Some(s))
    }
}
