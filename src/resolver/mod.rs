//! City lookup resolution.
//!
//! [`CityResolver`] answers a validated query from the store when it can and
//! falls back to the [`SuggestionProvider`] when the store cannot fill a
//! page, at most once per cooldown window. Fallback answers are written back
//! to the store in one atomic batch together with the rate-limit marker.
//!
//! # Policy
//!
//! In precedence order:
//! 1. one stored city whose lowercase name equals the query → `Exact match`
//! 2. a full page of stored cities → `Partial match`, no fallback
//! 3. otherwise, if the cooldown is still open → stored cities as
//!    `Partial match`, or `No match` when there are none
//! 4. otherwise ask the provider for the missing `max - stored` cities
//!
//! Store and provider failures never reach the caller: a failed search
//! counts as zero stored cities and a failed fallback answers `No match`.
//!
//! # Concurrency
//!
//! The marker is read, then written in a later batch, with nothing holding
//! it in between. Two concurrent misses can both see an expired marker and
//! both call the provider; their batches then overwrite the same city
//! documents with equivalent data. Closing that gap needs a conditional
//! write on the marker, which the [`CityStore`] contract does not offer.

mod builder;
mod throttle;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::providers::{SuggestionProvider, parse_suggestions};
use crate::store::{CityStore, WriteBatch};
use crate::telemetry;
use crate::Result;
use crate::types::{CityQuery, CityRecord, LookupResponse, MatchType, ValidationError};

pub use builder::CityResolverBuilder;
pub use throttle::{DEFAULT_COOLDOWN, FallbackThrottle};

/// Default page size.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Where a lookup's answer came from, for metrics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookupSource {
    Store,
    Throttled,
    Fallback,
}

impl LookupSource {
    fn as_str(self) -> &'static str {
        match self {
            LookupSource::Store => "store",
            LookupSource::Throttled => "throttled",
            LookupSource::Fallback => "fallback",
        }
    }
}

fn match_label(match_type: MatchType) -> &'static str {
    match match_type {
        MatchType::Exact => "exact",
        MatchType::Partial => "partial",
        MatchType::None => "none",
    }
}

/// Concatenate `first` and `second`, dropping exact duplicates.
///
/// The first occurrence wins, so order follows `first` then `second`.
pub fn merge_unique(
    first: impl IntoIterator<Item = String>,
    second: impl IntoIterator<Item = String>,
) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for city in first.into_iter().chain(second) {
        if !merged.contains(&city) {
            merged.push(city);
        }
    }
    merged
}

/// Resolves city queries against a store with a rate-limited fallback.
pub struct CityResolver {
    store: Arc<dyn CityStore>,
    provider: Arc<dyn SuggestionProvider>,
    max_suggestions: usize,
    throttle: FallbackThrottle,
}

impl CityResolver {
    /// Create a new builder for configuring the resolver.
    pub fn builder() -> CityResolverBuilder {
        CityResolverBuilder::new()
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    pub fn throttle(&self) -> FallbackThrottle {
        self.throttle
    }

    /// Validate `raw` and resolve it.
    ///
    /// Validation failures are returned before the store or provider is
    /// touched.
    pub async fn lookup(
        &self,
        raw: Option<&str>,
    ) -> std::result::Result<LookupResponse, ValidationError> {
        let query = CityQuery::parse(raw)?;
        Ok(self.resolve(&query).await)
    }

    /// Resolve a validated query. Never fails; see the module docs.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn resolve(&self, query: &CityQuery) -> LookupResponse {
        let stored = self.stored_cities(query).await;

        if let [only] = stored.as_slice()
            && only.name_lowercase == query.lowercase()
        {
            let response = LookupResponse::new(MatchType::Exact, vec![only.formatted()]);
            return self.finish(response, LookupSource::Store);
        }

        if stored.len() >= self.max_suggestions {
            let response = LookupResponse::new(MatchType::Partial, format_all(&stored));
            return self.finish(response, LookupSource::Store);
        }

        if !self.fallback_permitted().await {
            metrics::counter!(telemetry::FALLBACK_THROTTLED_TOTAL).increment(1);
            let response = if stored.is_empty() {
                LookupResponse::no_match()
            } else {
                LookupResponse::new(MatchType::Partial, format_all(&stored))
            };
            return self.finish(response, LookupSource::Throttled);
        }

        let response = match self.fetch_fallback(query, &stored).await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    provider = self.provider.name(),
                    upstream = err.is_upstream(),
                    error = %err,
                    "fallback failed, answering no match"
                );
                LookupResponse::no_match()
            }
        };
        self.finish(response, LookupSource::Fallback)
    }

    /// Prefix search; failures count as an empty result.
    async fn stored_cities(&self, query: &CityQuery) -> Vec<CityRecord> {
        match self
            .store
            .search_prefix(query.lowercase(), self.max_suggestions)
            .await
        {
            Ok(cities) => cities,
            Err(err) => {
                metrics::counter!(telemetry::STORE_ERRORS_TOTAL, "operation" => "search")
                    .increment(1);
                warn!(store = self.store.name(), error = %err, "city search failed");
                Vec::new()
            }
        }
    }

    /// Whether the cooldown window has closed. An unreadable marker blocks.
    async fn fallback_permitted(&self) -> bool {
        match self.store.last_fetched().await {
            Ok(last) => self.throttle.permits(last, Utc::now()),
            Err(err) => {
                metrics::counter!(telemetry::STORE_ERRORS_TOTAL, "operation" => "marker")
                    .increment(1);
                warn!(store = self.store.name(), error = %err, "rate-limit marker unreadable");
                false
            }
        }
    }

    /// Call the provider and persist its answer, recording call metrics.
    async fn fetch_fallback(
        &self,
        query: &CityQuery,
        stored: &[CityRecord],
    ) -> Result<LookupResponse> {
        let start = Instant::now();
        let result = self.call_and_persist(query, stored).await;

        let provider = self.provider.name().to_owned();
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::FALLBACK_CALLS_TOTAL,
            "provider" => provider.clone(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::FALLBACK_DURATION_SECONDS,
            "provider" => provider,
        )
        .record(start.elapsed().as_secs_f64());

        result
    }

    async fn call_and_persist(
        &self,
        query: &CityQuery,
        stored: &[CityRecord],
    ) -> Result<LookupResponse> {
        let wanted = self.max_suggestions - stored.len();
        debug!(wanted, stored = stored.len(), "calling fallback provider");

        let raw = self.provider.suggest(query.as_str(), wanted).await?;
        let suggestions = parse_suggestions(&raw)?;

        if stored.is_empty() && suggestions.match_type == MatchType::None {
            return Ok(LookupResponse::no_match());
        }

        let records = suggestions.records();
        let learned = records.len() as u64;
        let mut batch = WriteBatch::new();
        batch.extend(records);
        if let Err(err) = self.store.commit(batch.touch_last_fetched()).await {
            metrics::counter!(telemetry::STORE_ERRORS_TOTAL, "operation" => "commit").increment(1);
            return Err(err);
        }
        metrics::counter!(telemetry::CITIES_LEARNED_TOTAL).increment(learned);

        let match_type = if stored.is_empty() {
            suggestions.match_type
        } else {
            MatchType::Partial
        };
        let cities = merge_unique(suggestions.cities, stored.iter().map(CityRecord::formatted));
        Ok(LookupResponse::new(match_type, cities))
    }

    fn finish(&self, response: LookupResponse, source: LookupSource) -> LookupResponse {
        metrics::counter!(telemetry::LOOKUPS_TOTAL,
            "match_type" => match_label(response.match_type),
            "source" => source.as_str(),
        )
        .increment(1);
        debug!(
            match_type = %response.match_type,
            source = source.as_str(),
            count = response.cities.len(),
            "lookup resolved"
        );
        response
    }
}

fn format_all(cities: &[CityRecord]) -> Vec<String> {
    cities.iter().map(CityRecord::formatted).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_first_occurrence() {
        let merged = merge_unique(
            vec!["A in X".to_string(), "B in Y".to_string()],
            vec!["A in X".to_string()],
        );
        assert_eq!(merged, vec!["A in X", "B in Y"]);
    }

    #[test]
    fn merge_drops_duplicates_within_one_side() {
        let merged = merge_unique(
            vec!["A in X".to_string(), "A in X".to_string()],
            vec!["C in Z".to_string(), "B in Y".to_string()],
        );
        assert_eq!(merged, vec!["A in X", "C in Z", "B in Y"]);
    }
}
