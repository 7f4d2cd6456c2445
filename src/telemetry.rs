//! Telemetry metric name constants.
//!
//! Centralised metric names for citysuggest operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `citysuggest_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `match_type`: `"exact"`, `"partial"` or `"none"`
//! - `source`: where the answer came from: `"store"`, `"throttled"`, `"fallback"`
//! - `provider`: fallback provider name (e.g. "openai")
//! - `status`: outcome: "ok" or "error"
//! - `operation`: store operation: "search", "marker", "commit"

/// Total resolved lookups.
///
/// Labels: `match_type`, `source`.
pub const LOOKUPS_TOTAL: &str = "citysuggest_lookups_total";

/// Total fallback provider calls (parse and persistence included).
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const FALLBACK_CALLS_TOTAL: &str = "citysuggest_fallback_calls_total";

/// Fallback call duration in seconds.
///
/// Labels: `provider`.
pub const FALLBACK_DURATION_SECONDS: &str = "citysuggest_fallback_duration_seconds";

/// Fallback calls skipped because the cooldown window was still open.
pub const FALLBACK_THROTTLED_TOTAL: &str = "citysuggest_fallback_throttled_total";

/// Cities written to the store from fallback answers.
pub const CITIES_LEARNED_TOTAL: &str = "citysuggest_cities_learned_total";

/// Store failures recovered locally.
///
/// Labels: `operation` ("search" | "marker" | "commit").
pub const STORE_ERRORS_TOTAL: &str = "citysuggest_store_errors_total";
