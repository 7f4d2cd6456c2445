//! Atomic write batches.

use crate::types::CityRecord;

/// A single write inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchWrite {
    /// Create or fully overwrite a city document.
    SetCity(CityRecord),
    /// Set the rate-limit marker's `last_fetched` to the store's clock.
    TouchLastFetched,
}

/// Ordered set of writes applied atomically by [`CityStore::commit`](super::CityStore::commit).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<BatchWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a city upsert.
    pub fn set_city(mut self, city: CityRecord) -> Self {
        self.writes.push(BatchWrite::SetCity(city));
        self
    }

    /// Queue a marker refresh using server time.
    pub fn touch_last_fetched(mut self) -> Self {
        self.writes.push(BatchWrite::TouchLastFetched);
        self
    }

    pub fn writes(&self) -> &[BatchWrite] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<BatchWrite> {
        self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Cities queued in this batch, in insertion order.
    pub fn cities(&self) -> impl Iterator<Item = &CityRecord> {
        self.writes.iter().filter_map(|w| match w {
            BatchWrite::SetCity(city) => Some(city),
            BatchWrite::TouchLastFetched => None,
        })
    }
}

impl Extend<CityRecord> for WriteBatch {
    fn extend<I: IntoIterator<Item = CityRecord>>(&mut self, iter: I) {
        self.writes
            .extend(iter.into_iter().map(BatchWrite::SetCity));
    }
}
