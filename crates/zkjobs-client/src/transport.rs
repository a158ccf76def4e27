//! Transport abstraction.
//!
//! A [`Transport`] turns one [`ApiRequest`] into one [`RawResponse`]. It
//! never retries and reports every failure as a [`TransportError`]. Two
//! implementations exist: [`HttpTransport`] talks to the real backend and
//! [`MockNetwork`] answers in-process.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};
use zkjobs_models::QueryParams;

use crate::config::ClientConfig;
use crate::error::{TransportError, TransportResult};
use crate::http::HttpTransport;
use crate::intercept::MockNetwork;

// =============================================================================
// Request / response
// =============================================================================

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative API path such as `/jobs/job-0001`
    pub path: String,
    /// Canonical query parameters
    pub query: QueryParams,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Path plus canonical query string, e.g. `/jobs?limit=5&remote=true`.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query.to_query_string())
        }
    }

    /// Reject anything that is not a plain relative API path.
    pub fn validate(&self) -> TransportResult<()> {
        let path = self.path.as_str();

        if !path.starts_with('/') {
            return Err(TransportError::validation(format!(
                "API path must start with '/': {}",
                path
            )));
        }
        if path.starts_with("//") || path.contains("://") {
            return Err(TransportError::validation(format!(
                "API path must be relative, got {}",
                path
            )));
        }
        if path.contains('?') || path.contains('#') {
            return Err(TransportError::validation(format!(
                "API path must not carry a query or fragment: {}",
                path
            )));
        }
        if path.split('/').any(|segment| segment == ".." || segment == ".") {
            return Err(TransportError::validation(format!(
                "API path must not contain dot segments: {}",
                path
            )));
        }

        Ok(())
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.target())
    }
}

/// Undecoded response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// Transport trait
// =============================================================================

/// Issues exactly one request per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> TransportResult<RawResponse>;
}

/// Pick the transport for `config`.
///
/// The mock network is installed only when mocking is enabled and the
/// client runs in a browser context; otherwise requests go over HTTP.
pub fn build_transport(config: &ClientConfig) -> TransportResult<Arc<dyn Transport>> {
    if config.mocking_active() {
        info!(
            seed = config.mock.seed,
            failure_rate = config.mock.failure_rate,
            latency_ms = config.mock.latency.as_millis() as u64,
            "Network interception enabled"
        );
        return Ok(Arc::new(MockNetwork::with_job_handlers(config.mock.clone())));
    }

    if config.mock.enabled {
        debug!(
            runtime = config.runtime.as_str(),
            "Mocking requested outside a browser context, using HTTP transport"
        );
    }

    Ok(Arc::new(HttpTransport::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MockConfig, RuntimeContext};
    use crate::error::ErrorKind;

    #[test]
    fn test_target_uses_canonical_query() {
        let query: QueryParams = [("remote", "true"), ("limit", "5")].into_iter().collect();
        let request = ApiRequest::get("/jobs").with_query(query);
        assert_eq!(request.target(), "/jobs?limit=5&remote=true");
        assert_eq!(request.to_string(), "GET /jobs?limit=5&remote=true");
    }

    #[test]
    fn test_validate_accepts_relative_paths() {
        assert!(ApiRequest::get("/jobs").validate().is_ok());
        assert!(ApiRequest::get("/jobs/job-0001").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_absolute_and_odd_paths() {
        for path in [
            "jobs",
            "//evil.example.com/jobs",
            "/redirect?to=http://evil.example.com",
            "/jobs?limit=5",
            "/jobs/../admin",
            "/jobs/.",
            "/./jobs",
            "https://evil.example.com/jobs",
        ] {
            let err = ApiRequest::get(path).validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "path {}", path);
        }
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(304, "").is_success());
        assert!(!RawResponse::new(500, "").is_success());
    }

    #[tokio::test]
    async fn test_build_transport_uses_mock_only_in_browser() {
        let browser = ClientConfig::default()
            .with_runtime(RuntimeContext::Browser)
            .with_mock(MockConfig::seeded(1));
        let transport = build_transport(&browser).unwrap();
        let err = transport
            .execute(&ApiRequest::get("/not-a-route"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unmocked);

        // Same flag on the server: real HTTP transport, which fails to connect
        // to a closed port instead of reporting a missing mock.
        let server = ClientConfig::new("http://127.0.0.1:9")
            .with_mock(MockConfig::seeded(1))
            .with_timeout(std::time::Duration::from_secs(2));
        let transport = build_transport(&server).unwrap();
        let err = transport
            .execute(&ApiRequest::get("/not-a-route"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
