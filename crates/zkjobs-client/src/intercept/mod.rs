//! In-process network interception.
//!
//! [`MockNetwork`] stands in for the jobs backend so the UI can run without
//! one. Handlers are registered per method and path pattern. Every handled
//! request goes through the same pipeline:
//! - optional fixed latency plus seeded jitter
//! - seeded failure injection (answers HTTP 500)
//! - the matched handler
//!
//! Requests without a handler are not forwarded anywhere; they fail with
//! [`TransportError::Unmocked`] so a missing mock is visible immediately.
//!
//! All randomness comes from one RNG seeded from [`MockConfig::seed`], so a
//! given seed and request sequence always produce the same responses.

pub mod handlers;
pub mod route;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Method;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use zkjobs_models::JobCatalog;

use crate::config::{clamp_rate, MockConfig};
use crate::error::{TransportError, TransportResult};
use crate::metrics::{record_mock_request, record_request};
use crate::transport::{ApiRequest, RawResponse, Transport};

pub use route::{MockHandler, MockRequest, MockResponse, PathPattern};
use route::Route;

/// Message carried by injected failures.
pub const INJECTED_FAILURE_MESSAGE: &str = "Injected mock failure";

/// Mock backend.
pub struct MockNetwork {
    routes: Vec<Route>,
    config: MockConfig,
    rng: Mutex<StdRng>,
}

impl MockNetwork {
    /// Mock network with no handlers. A failure rate outside [0, 1] is
    /// clamped into range.
    pub fn new(mut config: MockConfig) -> Self {
        config.failure_rate = clamp_rate(config.failure_rate);
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            routes: Vec::new(),
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Mock network serving a synthetic catalog generated from the config
    /// seed.
    pub fn with_job_handlers(config: MockConfig) -> Self {
        let catalog = Arc::new(JobCatalog::generate(config.seed, config.catalog_size));
        Self::with_catalog(config, catalog)
    }

    /// Mock network serving `catalog` on `GET /jobs` and `GET /jobs/:id`.
    pub fn with_catalog(config: MockConfig, catalog: Arc<JobCatalog>) -> Self {
        Self::new(config)
            .on(Method::GET, "/jobs", handlers::list_jobs(&catalog))
            .on(Method::GET, "/jobs/:id", handlers::get_job(&catalog))
    }

    /// Register a handler. Earlier registrations win when patterns overlap.
    pub fn on<F>(mut self, method: Method, pattern: &str, handler: F) -> Self
    where
        F: Fn(&MockRequest) -> MockResponse + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            pattern: PathPattern::parse(pattern),
            handler: Arc::new(handler),
        });
        self
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    fn match_route(&self, request: &ApiRequest) -> Option<(&Route, MockRequest)> {
        self.routes
            .iter()
            .filter(|route| route.method == request.method)
            .find_map(|route| {
                route.pattern.matches(&request.path).map(|params| {
                    let mock_request = MockRequest {
                        method: request.method.clone(),
                        path: request.path.clone(),
                        query: request.query.clone(),
                        params,
                    };
                    (route, mock_request)
                })
            })
    }

    /// Draw the delay and failure decision for one request.
    async fn roll(&self) -> (Duration, bool) {
        let mut rng = self.rng.lock().await;

        let jitter_ms = self.config.jitter.as_millis() as u64;
        let jitter = if jitter_ms > 0 {
            Duration::from_millis(rng.random_range(0..=jitter_ms))
        } else {
            Duration::ZERO
        };

        let fail = self.config.failure_rate > 0.0 && rng.random_bool(self.config.failure_rate);

        (self.config.latency + jitter, fail)
    }
}

#[async_trait]
impl Transport for MockNetwork {
    async fn execute(&self, request: &ApiRequest) -> TransportResult<RawResponse> {
        request.validate()?;

        let Some((route, mock_request)) = self.match_route(request) else {
            warn!(
                method = %request.method,
                path = %request.path,
                "Unmocked request, register a handler for it"
            );
            record_mock_request("unmocked");
            return Err(TransportError::Unmocked {
                method: request.method.to_string(),
                path: request.path.clone(),
            });
        };

        let start = Instant::now();
        let (delay, fail) = self.roll().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let response = if fail {
            record_mock_request("injected_failure");
            debug!(request = %request, "Injecting mock failure");
            MockResponse::error(500, INJECTED_FAILURE_MESSAGE)
        } else {
            record_mock_request("handled");
            (route.handler)(&mock_request)
        };

        record_request(
            "mock",
            response.status,
            start.elapsed().as_secs_f64() * 1000.0,
        );

        Ok(RawResponse::new(response.status, response.body.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use zkjobs_models::{ApiEnvelope, Job, QueryParams};

    fn list_request(query: &[(&str, &str)]) -> ApiRequest {
        let query: QueryParams = query.iter().copied().collect();
        ApiRequest::get("/jobs").with_query(query)
    }

    fn decode_list(response: RawResponse) -> Vec<Job> {
        let envelope: ApiEnvelope<Vec<Job>> = serde_json::from_str(&response.body).unwrap();
        envelope.data.unwrap()
    }

    #[tokio::test]
    async fn test_remote_location_filter_is_reproducible() {
        let request = list_request(&[("location", "Remote"), ("limit", "100")]);

        let first = MockNetwork::with_job_handlers(MockConfig::seeded(42));
        let a = decode_list(first.execute(&request).await.unwrap());

        let second = MockNetwork::with_job_handlers(MockConfig::seeded(42));
        let b = decode_list(second.execute(&request).await.unwrap());

        assert!(!a.is_empty());
        assert!(a.iter().all(|job| job.remote));
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_list_is_paginated_with_meta() {
        let network = MockNetwork::with_job_handlers(MockConfig::seeded(42).with_catalog_size(30));
        let response = network
            .execute(&list_request(&[("limit", "10"), ("offset", "25")]))
            .await
            .unwrap();
        let envelope: ApiEnvelope<Vec<Job>> = serde_json::from_str(&response.body).unwrap();
        let meta = envelope.meta.unwrap();
        assert_eq!(meta.total, 30);
        assert_eq!(envelope.data.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_get_job_by_id_and_missing_id() {
        let network = MockNetwork::with_job_handlers(MockConfig::seeded(42));

        let found = network.execute(&ApiRequest::get("/jobs/job-0001")).await.unwrap();
        assert_eq!(found.status, 200);
        let envelope: ApiEnvelope<Job> = serde_json::from_str(&found.body).unwrap();
        assert_eq!(envelope.data.unwrap().id.as_str(), "job-0001");

        let missing = network.execute(&ApiRequest::get("/jobs/job-9999")).await.unwrap();
        assert_eq!(missing.status, 404);
    }

    #[tokio::test]
    async fn test_unmatched_path_is_unmocked() {
        let network = MockNetwork::with_job_handlers(MockConfig::seeded(42));
        let err = network
            .execute(&ApiRequest::get("/companies"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unmocked);

        let err = network
            .execute(&ApiRequest::new(Method::POST, "/jobs"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unmocked);
    }

    #[tokio::test]
    async fn test_failure_rate_one_always_fails() {
        let network =
            MockNetwork::with_job_handlers(MockConfig::seeded(42).with_failure_rate(1.0));
        for _ in 0..5 {
            let response = network.execute(&list_request(&[])).await.unwrap();
            assert_eq!(response.status, 500);
            assert!(response.body.contains(INJECTED_FAILURE_MESSAGE));
        }
    }

    #[tokio::test]
    async fn test_failure_injection_is_seeded() {
        async fn outcomes(seed: u64) -> Vec<u16> {
            let network =
                MockNetwork::with_job_handlers(MockConfig::seeded(seed).with_failure_rate(0.5));
            let mut statuses = Vec::new();
            for _ in 0..20 {
                statuses.push(network.execute(&list_request(&[])).await.unwrap().status);
            }
            statuses
        }

        let a = outcomes(9).await;
        assert_eq!(a, outcomes(9).await);
        assert!(a.contains(&500));
        assert!(a.contains(&200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let network = MockNetwork::with_job_handlers(
            MockConfig::seeded(42).with_latency(Duration::from_millis(400)),
        );
        let start = tokio::time::Instant::now();
        network.execute(&list_request(&[])).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_out_of_range_failure_rate_is_clamped() {
        let always = MockNetwork::with_job_handlers(MockConfig {
            failure_rate: 1.5,
            ..MockConfig::seeded(1)
        });
        assert_eq!(always.config().failure_rate, 1.0);
        for _ in 0..3 {
            let response = always.execute(&list_request(&[])).await.unwrap();
            assert_eq!(response.status, 500);
        }

        for rate in [-0.5, f64::NAN] {
            let never = MockNetwork::with_job_handlers(MockConfig {
                failure_rate: rate,
                ..MockConfig::seeded(1)
            });
            assert_eq!(never.config().failure_rate, 0.0);
            let response = never.execute(&list_request(&[])).await.unwrap();
            assert_eq!(response.status, 200);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_jitter_stays_in_range_and_is_seeded() {
        let latency = Duration::from_millis(100);
        let jitter = Duration::from_millis(50);
        let config = MockConfig::seeded(7).with_latency(latency).with_jitter(jitter);

        async fn delays(network: &MockNetwork) -> Vec<Duration> {
            let mut delays = Vec::new();
            for _ in 0..20 {
                delays.push(network.roll().await.0);
            }
            delays
        }

        let a = delays(&MockNetwork::with_job_handlers(config.clone())).await;
        let b = delays(&MockNetwork::with_job_handlers(config.clone())).await;
        assert_eq!(a, b);
        assert!(a.iter().all(|d| *d >= latency && *d <= latency + jitter));
        assert!(a.iter().any(|d| *d != a[0]));

        let network = MockNetwork::with_job_handlers(config);
        for _ in 0..5 {
            let start = tokio::time::Instant::now();
            network.execute(&list_request(&[])).await.unwrap();
            let elapsed = start.elapsed();
            assert!(elapsed >= latency);
            assert!(elapsed <= latency + jitter + Duration::from_millis(1));
        }
    }

    #[tokio::test]
    async fn test_invalid_list_parameters_answer_400() {
        let network = MockNetwork::with_job_handlers(MockConfig::seeded(42));
        for query in [[("limit", "500")], [("remote", "maybe")], [("offset", "ten")]] {
            let response = network.execute(&list_request(&query)).await.unwrap();
            assert_eq!(response.status, 400);
            let envelope: ApiEnvelope<Vec<Job>> = serde_json::from_str(&response.body).unwrap();
            assert!(!envelope.success);
            assert!(envelope.error.is_some());
        }

        let ok = network
            .execute(&list_request(&[("limit", "100"), ("remote", "true")]))
            .await
            .unwrap();
        assert_eq!(ok.status, 200);
    }

    #[tokio::test]
    async fn test_custom_handler_registration() {
        let network = MockNetwork::new(MockConfig::seeded(1))
            .on(Method::GET, "/health", |_| MockResponse::ok("healthy"));
        assert_eq!(network.route_count(), 1);
        let response = network.execute(&ApiRequest::get("/health")).await.unwrap();
        assert_eq!(response.status, 200);
    }
}
