//! Persisted city records.

use serde::{Deserialize, Serialize};

/// Separator between city and country in a rendered suggestion.
pub const SUGGESTION_SEPARATOR: &str = " in ";

/// A city as stored in the document store.
///
/// `name_lowercase` is the sort key for prefix search and the document key;
/// it is always derived from `name` by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub name_lowercase: String,
    pub country: String,
    pub is_approved: bool,
}

impl CityRecord {
    /// Create an approved record, deriving the lowercase key from `name`.
    pub fn approved(name: impl Into<String>, country: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name_lowercase: name.to_lowercase(),
            name,
            country: country.into(),
            is_approved: true,
        }
    }

    /// Create a record awaiting approval (never returned by prefix search).
    pub fn unapproved(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            is_approved: false,
            ..Self::approved(name, country)
        }
    }

    /// Build an approved record from a `"Name in Country"` suggestion.
    ///
    /// Splits on the first `" in "`. Returns `None` when either side is
    /// empty after trimming.
    pub fn from_suggestion(suggestion: &str) -> Option<Self> {
        let (name, country) = suggestion.split_once(SUGGESTION_SEPARATOR)?;
        let (name, country) = (name.trim(), country.trim());
        if name.is_empty() || country.is_empty() {
            return None;
        }
        Some(Self::approved(name, country))
    }

    /// Render as `"{name} in {country}"`.
    pub fn formatted(&self) -> String {
        format!("{}{SUGGESTION_SEPARATOR}{}", self.name, self.country)
    }

    /// Document id for this record.
    ///
    /// Document stores reserve `/` as a path separator, so it is replaced.
    pub fn document_id(&self) -> String {
        self.name_lowercase.replace('/', "-")
    }
}

/// Seed entry accepted by [`MemoryStore::seed_from_file`](crate::store::MemoryStore::seed_from_file).
///
/// The lowercase key is always derived, never read from the seed.
#[derive(Debug, Clone, Deserialize)]
pub struct CitySeed {
    pub name: String,
    pub country: String,
    #[serde(default = "default_approved")]
    pub is_approved: bool,
}

fn default_approved() -> bool {
    true
}

impl From<CitySeed> for CityRecord {
    fn from(seed: CitySeed) -> Self {
        if seed.is_approved {
            CityRecord::approved(seed.name, seed.country)
        } else {
            CityRecord::unapproved(seed.name, seed.country)
        }
    }
}
