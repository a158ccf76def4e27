//! HTTP transport backed by reqwest.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, info_span, Instrument};

use crate::config::ClientConfig;
use crate::error::{TransportError, TransportResult};
use crate::metrics::record_request;
use crate::transport::{ApiRequest, RawResponse, Transport};

/// Sends requests to the real jobs API.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("zkjobs-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a request.
    pub fn url_for(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.base_url, request.target())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> TransportResult<RawResponse> {
        request.validate()?;

        let url = self.url_for(request);
        let span = info_span!("transport", method = %request.method, path = %request.path);
        let start = Instant::now();

        async {
            let response = self
                .http
                .request(request.method.clone(), &url)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| {
                    record_request("http", 0, start.elapsed().as_secs_f64() * 1000.0);
                    if e.is_timeout() {
                        TransportError::network(format!(
                            "{} timed out after {}s",
                            url,
                            self.timeout.as_secs()
                        ))
                    } else {
                        TransportError::network(format!("{} failed: {}", url, e))
                    }
                })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::network(format!("{} body read failed: {}", url, e)))?;

            let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
            record_request("http", status, latency_ms);
            debug!(status, latency_ms, "Response received");

            Ok(RawResponse { status, body })
        }
        .instrument(span)
        .await
    }
}
