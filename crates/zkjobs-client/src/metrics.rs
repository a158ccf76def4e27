//! Client metrics collection.
//!
//! Provides standardized metrics for monitoring API traffic:
//! - Request counters by transport and status
//! - Latency histograms
//! - Mock network interceptions and injected failures

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total API requests by transport and status.
    pub const REQUESTS_TOTAL: &str = "zkjobs_client_requests_total";

    /// Request latency in seconds by transport.
    pub const LATENCY_SECONDS: &str = "zkjobs_client_latency_seconds";

    /// Requests answered by the mock network, by outcome.
    pub const MOCK_REQUESTS_TOTAL: &str = "zkjobs_client_mock_requests_total";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record metrics for a completed request. `status` is 0 when no response
/// arrived.
pub fn record_request(transport: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "transport" => transport.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "transport" => transport.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record a request seen by the mock network. `outcome` is one of
/// `handled`, `injected_failure` or `unmocked`.
pub fn record_mock_request(outcome: &'static str) {
    counter!(names::MOCK_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}
