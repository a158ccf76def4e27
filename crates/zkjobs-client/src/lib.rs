//! Jobs API client.
//!
//! This crate provides:
//! - A transport abstraction with a reqwest-backed HTTP implementation
//! - An opt-in mock network that answers requests in-process
//! - A typed API client that decodes response envelopes
//! - The `JobsService` façade used by UI code
//! - A single error taxonomy (`network`, `http:<status>`, `decode`,
//!   `unmocked`, `validation`)

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod intercept;
pub mod metrics;
pub mod service;
pub mod transport;

pub use api::{ApiClient, ApiResponse};
pub use config::{ClientConfig, ConfigError, MockConfig, RuntimeContext};
pub use error::{ErrorKind, ServiceError, ServiceResult, TransportError, TransportResult};
pub use http::HttpTransport;
pub use intercept::{MockNetwork, MockRequest, MockResponse};
pub use service::{JobsService, JOBS_RESOURCE};
pub use transport::{build_transport, ApiRequest, RawResponse, Transport};
