//! Telemetry metric name constants.
//!
//! Centralised metric names for muninn operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `muninn_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `class` — request class ("passthrough" | "image" | "shell")
//! - `strategy` — retrieval strategy ("cache_first" | "stale_while_revalidate")
//! - `status` — outcome: "ok" or "error"

/// Total intercepted requests routed through the engine.
///
/// Labels: `class`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "muninn_requests_total";

/// Total cache hits.
///
/// Labels: `strategy`.
pub const CACHE_HITS_TOTAL: &str = "muninn_cache_hits_total";

/// Total cache misses.
///
/// Labels: `strategy`.
pub const CACHE_MISSES_TOTAL: &str = "muninn_cache_misses_total";

/// Total background revalidations attempted after serving a stale entry.
///
/// Labels: `status` ("ok" | "error").
pub const REVALIDATIONS_TOTAL: &str = "muninn_revalidations_total";

/// Total precache items processed.
///
/// Labels: `status` ("ok" | "error").
pub const PRECACHE_ITEMS_TOTAL: &str = "muninn_precache_items_total";

/// Total stale cache sets deleted during activation.
pub const GENERATIONS_DELETED_TOTAL: &str = "muninn_generations_deleted_total";
