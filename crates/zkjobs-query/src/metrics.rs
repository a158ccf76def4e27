//! Query cache metrics.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Cache lookups by outcome.
    pub const LOOKUPS_TOTAL: &str = "zkjobs_query_lookups_total";

    /// Entries removed by garbage collection.
    pub const EVICTIONS_TOTAL: &str = "zkjobs_query_evictions_total";
}

/// Record a cache lookup. `outcome` is one of `hit`, `revalidate`, `dedup`,
/// `error_hit`, `fetch`, `refetch` or `superseded`.
pub fn record_lookup(outcome: &'static str) {
    counter!(names::LOOKUPS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_evictions(count: usize) {
    counter!(names::EVICTIONS_TOTAL).increment(count as u64);
}
