//! In-process city store.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{BatchWrite, CityStore, WriteBatch, prefix_bounds};
use crate::types::{CityRecord, CitySeed};
use crate::{CitySuggestError, Result};

#[derive(Debug, Default)]
struct Inner {
    /// Keyed by `name_lowercase`, so range iteration is already ordered.
    cities: BTreeMap<String, CityRecord>,
    last_fetched: Option<DateTime<Utc>>,
}

/// City store held in memory.
///
/// Batches are applied under a single write lock, which makes them atomic
/// with respect to concurrent readers. The store's clock (`Utc::now()` at
/// commit time) stands in for server time.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    commits: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `cities`.
    pub fn with_cities(cities: impl IntoIterator<Item = CityRecord>) -> Self {
        let cities = cities
            .into_iter()
            .map(|c| (c.name_lowercase.clone(), c))
            .collect();
        Self {
            inner: RwLock::new(Inner {
                cities,
                last_fetched: None,
            }),
            commits: AtomicUsize::new(0),
        }
    }

    /// Set the initial rate-limit marker.
    pub fn with_last_fetched(mut self, at: DateTime<Utc>) -> Self {
        self.inner.get_mut().last_fetched = Some(at);
        self
    }

    /// Load a store from a JSON array of [`CitySeed`] entries.
    pub async fn seed_from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CitySuggestError::Configuration(format!("Failed to read seed file {path:?}: {e}"))
        })?;
        let seeds: Vec<CitySeed> = serde_json::from_str(&content).map_err(|e| {
            CitySuggestError::Configuration(format!("Failed to parse seed file {path:?}: {e}"))
        })?;
        debug!(count = seeds.len(), ?path, "seeding memory store");
        Ok(Self::with_cities(seeds.into_iter().map(CityRecord::from)))
    }

    /// Look up a city by its lowercase name, approved or not.
    pub async fn get(&self, name_lowercase: &str) -> Option<CityRecord> {
        self.inner.read().await.cities.get(name_lowercase).cloned()
    }

    /// Number of stored cities.
    pub async fn len(&self) -> usize {
        self.inner.read().await.cities.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of batches committed so far.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CityStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn search_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<CityRecord>> {
        let (start, end) = prefix_bounds(prefix);
        let inner = self.inner.read().await;
        Ok(inner
            .cities
            .range(start..=end)
            .map(|(_, city)| city)
            .filter(|city| city.is_approved)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn last_fetched(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.inner.read().await.last_fetched)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        for write in batch.into_writes() {
            match write {
                BatchWrite::SetCity(city) => {
                    inner.cities.insert(city.name_lowercase.clone(), city);
                }
                BatchWrite::TouchLastFetched => inner.last_fetched = Some(now),
            }
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
