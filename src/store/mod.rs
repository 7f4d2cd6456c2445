//! Document store abstraction for city records.
//!
//! The resolver only needs four things from a store:
//! - a prefix range query over approved cities, ordered by `name_lowercase`
//! - a read of the rate-limit marker
//! - an atomic batched write (set semantics per document)
//! - a server-assigned timestamp for the marker, applied inside that batch
//!
//! [`CityStore`] captures exactly that. Two implementations ship with the
//! crate: [`MemoryStore`] (tests, local runs, seeded demos) and
//! `FirestoreStore` (the `firestore` feature, Firestore REST API).

mod batch;
#[cfg(feature = "firestore")]
pub mod firestore;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;
use crate::types::CityRecord;

pub use batch::{BatchWrite, WriteBatch};
#[cfg(feature = "firestore")]
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::MemoryStore;

/// Sentinel appended to a prefix to form the inclusive upper bound of a
/// prefix range. It sorts after every realistic suffix.
pub const PREFIX_RANGE_SENTINEL: char = '\u{f8ff}';

/// Inclusive `(start, end)` bounds for a prefix range over lowercase keys.
pub fn prefix_bounds(prefix: &str) -> (String, String) {
    (
        prefix.to_string(),
        format!("{prefix}{PREFIX_RANGE_SENTINEL}"),
    )
}

/// Persistent store of city records and the fallback rate-limit marker.
#[async_trait]
pub trait CityStore: Send + Sync {
    /// Store name for logging/debugging.
    fn name(&self) -> &str;

    /// Approved cities whose `name_lowercase` starts with `prefix`, ordered
    /// by `name_lowercase`, at most `limit` of them.
    ///
    /// `prefix` is already lowercase.
    async fn search_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<CityRecord>>;

    /// Timestamp of the most recent successful fallback call, if any.
    async fn last_fetched(&self) -> Result<Option<DateTime<Utc>>>;

    /// Apply every write in `batch` atomically: all succeed or none do.
    async fn commit(&self, batch: WriteBatch) -> Result<()>;
}
