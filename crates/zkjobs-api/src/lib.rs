//! Axum HTTP API server.
//!
//! This crate provides:
//! - `/api/v1/jobs` and `/api/v1/jobs/:id` over a seeded synthetic catalog
//! - `/health` and `/live` checks
//! - CORS, request ids, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
