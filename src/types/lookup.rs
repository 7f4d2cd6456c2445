//! Lookup outcome types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Quality of a lookup outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "Exact match")]
    Exact,
    #[serde(rename = "Partial match")]
    Partial,
    #[serde(rename = "No match")]
    None,
}

impl MatchType {
    /// Wire label, e.g. `"Partial match"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "Exact match",
            MatchType::Partial => "Partial match",
            MatchType::None => "No match",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label is not one of the three match types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match type label: {0:?}")]
pub struct UnknownMatchType(pub String);

impl FromStr for MatchType {
    type Err = UnknownMatchType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Exact match" => Ok(MatchType::Exact),
            "Partial match" => Ok(MatchType::Partial),
            "No match" => Ok(MatchType::None),
            other => Err(UnknownMatchType(other.to_string())),
        }
    }
}

/// Result of resolving one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    pub match_type: MatchType,
    /// Suggestions rendered as `"Name in Country"`.
    pub cities: Vec<String>,
}

impl LookupResponse {
    pub fn new(match_type: MatchType, cities: Vec<String>) -> Self {
        Self { match_type, cities }
    }

    /// `"No match"` with no suggestions.
    pub fn no_match() -> Self {
        Self::new(MatchType::None, Vec::new())
    }
}
