//! Jobs service façade.
//!
//! The only interface UI code calls. Each operation builds a canonical
//! request, unwraps the response data and converts transport failures into a
//! [`ServiceError`]. The full transport error is logged before it is
//! normalized.

use tracing::warn;
use zkjobs_models::{Job, JobFilter, PageMeta, PaginatedResponse, QueryParams};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ServiceError, ServiceResult, TransportError};

/// Resource name used in request keys for job listings.
pub const JOBS_RESOURCE: &str = "jobs";

/// Typed operations on job postings.
#[derive(Clone)]
pub struct JobsService {
    api: ApiClient,
}

impl JobsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Service using the transport selected by `config`.
    pub fn from_config(config: &ClientConfig) -> ServiceResult<Self> {
        let api = ApiClient::from_config(config).map_err(|e| normalize("from_config", e))?;
        Ok(Self::new(api))
    }

    /// List postings matching `filter`.
    pub async fn get_jobs(&self, filter: &JobFilter) -> ServiceResult<Vec<Job>> {
        Ok(self.get_jobs_page(filter).await?.data)
    }

    /// List postings matching `filter`, keeping pagination metadata.
    pub async fn get_jobs_page(&self, filter: &JobFilter) -> ServiceResult<PaginatedResponse<Job>> {
        let response = self
            .api
            .get::<Vec<Job>>("/jobs", &filter.to_params())
            .await
            .map_err(|e| normalize("get_jobs", e))?;

        let meta = response.meta.unwrap_or(PageMeta {
            total: response.data.len(),
            limit: filter.effective_limit(),
            offset: filter.effective_offset(),
        });

        // A page larger than its limit means the backend ignored the filter.
        if response.data.len() > meta.limit {
            return Err(normalize(
                "get_jobs",
                TransportError::decode(format!(
                    "Page of {} jobs exceeds limit {}",
                    response.data.len(),
                    meta.limit
                )),
            ));
        }

        Ok(PaginatedResponse {
            data: response.data,
            success: true,
            meta,
        })
    }

    /// Fetch one posting. An empty id fails locally with `validation`.
    pub async fn get_job(&self, id: &str) -> ServiceResult<Job> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ServiceError::validation("Job id must not be empty"));
        }

        let path = format!("/jobs/{}", urlencoding::encode(id));
        let response = self
            .api
            .get::<Job>(&path, &QueryParams::new())
            .await
            .map_err(|e| normalize("get_job", e))?;

        Ok(response.data)
    }

    /// List postings matching `query` on top of `filters`.
    pub async fn search_jobs(&self, query: &str, filters: &JobFilter) -> ServiceResult<Vec<Job>> {
        let merged = JobFilter {
            search: Some(query.to_string()),
            ..filters.clone()
        };
        self.get_jobs(&merged).await
    }
}

fn normalize(operation: &'static str, error: TransportError) -> ServiceError {
    warn!(
        operation,
        kind = %error.kind(),
        error = %error,
        "Jobs service request failed"
    );
    ServiceError::from(error)
}
