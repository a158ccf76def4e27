//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Liveness response.
#[derive(Serialize)]
pub struct LiveResponse {
    pub alive: bool,
    pub timestamp: String,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Liveness check.
pub async fn live() -> Json<LiveResponse> {
    Json(LiveResponse {
        alive: true,
        timestamp: Utc::now().to_rfc3339(),
    })
}
