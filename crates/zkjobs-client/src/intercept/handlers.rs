//! Default job handlers served by the mock network.

use std::sync::Arc;

use zkjobs_models::{ApiEnvelope, JobCatalog, JobFilter};

use super::route::{MockRequest, MockResponse};

/// `GET /jobs`: filtered, sorted, paginated slice of the catalog. Malformed
/// or out-of-range parameters answer 400, as the API server does.
pub fn list_jobs(catalog: &Arc<JobCatalog>) -> impl Fn(&MockRequest) -> MockResponse + Send + Sync + 'static {
    let catalog = Arc::clone(catalog);
    move |request: &MockRequest| {
        let filter = match JobFilter::try_from_params(&request.query) {
            Ok(filter) => filter,
            Err(message) => return MockResponse::error(400, message),
        };
        let page = catalog.query(&filter);
        MockResponse::json(200, &ApiEnvelope::from(page))
    }
}

/// `GET /jobs/:id`: one posting or 404.
pub fn get_job(catalog: &Arc<JobCatalog>) -> impl Fn(&MockRequest) -> MockResponse + Send + Sync + 'static {
    let catalog = Arc::clone(catalog);
    move |request: &MockRequest| match request.param("id").and_then(|id| catalog.get(id)) {
        Some(job) => MockResponse::ok(job),
        None => MockResponse::error(404, "Job not found"),
    }
}
