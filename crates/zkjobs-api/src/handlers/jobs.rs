//! Job listing handlers.
//!
//! Provides REST API endpoints for:
//! - Listing postings with search, location, remote and pagination filters
//! - Fetching one posting by id

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::debug;
use validator::Validate;

use zkjobs_models::{ApiEnvelope, Job, JobFilter};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `GET /api/v1/jobs`
pub async fn list_jobs(
    State(state): State<AppState>,
    filter: Result<Query<JobFilter>, QueryRejection>,
) -> ApiResult<Json<ApiEnvelope<Vec<Job>>>> {
    let Query(filter) = filter.map_err(|e| ApiError::bad_request(e.body_text()))?;
    filter.validate()?;

    let page = state.catalog.query(&filter);
    debug!(
        total = page.meta.total,
        returned = page.data.len(),
        offset = page.meta.offset,
        "Listed jobs"
    );

    Ok(Json(ApiEnvelope::from(page)))
}

/// `GET /api/v1/jobs/:id`
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<Job>>> {
    let job = state
        .catalog
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("Job {}", id)))?;

    Ok(Json(ApiEnvelope::ok(job)))
}
