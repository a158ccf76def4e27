//! What rendering code sees for job listings and job details.

use zkjobs_client::{ErrorKind, ServiceError};
use zkjobs_models::Job;

use crate::snapshot::{QuerySnapshot, QueryStatus};

/// State of a job listing.
#[derive(Debug, Clone, PartialEq)]
pub enum JobListView {
    /// First load, nothing to show yet
    Loading,
    /// Loaded, no postings matched
    Empty,
    /// Loaded postings. `refreshing` is set while a newer list is being fetched.
    Jobs { jobs: Vec<Job>, refreshing: bool },
    /// The last request failed. Offers a retry.
    Failed { kind: ErrorKind, message: String },
}

impl JobListView {
    pub fn from_snapshot(snapshot: &QuerySnapshot<Vec<Job>, ServiceError>) -> Self {
        if let (QueryStatus::Error, Some(error)) = (snapshot.status, &snapshot.error) {
            return JobListView::Failed {
                kind: error.kind,
                message: error.message.clone(),
            };
        }

        match &snapshot.data {
            None => JobListView::Loading,
            Some(jobs) if jobs.is_empty() => JobListView::Empty,
            Some(jobs) => JobListView::Jobs {
                jobs: jobs.clone(),
                refreshing: snapshot.is_refetching(),
            },
        }
    }

    /// Build from a one-shot result.
    pub fn from_result(result: &Result<Vec<Job>, ServiceError>) -> Self {
        match result {
            Ok(jobs) if jobs.is_empty() => JobListView::Empty,
            Ok(jobs) => JobListView::Jobs {
                jobs: jobs.clone(),
                refreshing: false,
            },
            Err(error) => JobListView::Failed {
                kind: error.kind,
                message: error.message.clone(),
            },
        }
    }

    /// Whether a retry button should be shown.
    pub fn can_retry(&self) -> bool {
        matches!(self, JobListView::Failed { .. })
    }

    pub fn jobs(&self) -> &[Job] {
        match self {
            JobListView::Jobs { jobs, .. } => jobs,
            _ => &[],
        }
    }
}

/// State of a single posting. A missing posting is reported apart from other
/// failures.
#[derive(Debug, Clone, PartialEq)]
pub enum JobDetailView {
    Loading,
    NotFound,
    Failed { kind: ErrorKind, message: String },
    Loaded(Job),
}

impl JobDetailView {
    pub fn from_snapshot(snapshot: &QuerySnapshot<Job, ServiceError>) -> Self {
        if let (QueryStatus::Error, Some(error)) = (snapshot.status, &snapshot.error) {
            return Self::from_error(error);
        }

        match &snapshot.data {
            Some(job) => JobDetailView::Loaded(job.clone()),
            None => JobDetailView::Loading,
        }
    }

    pub fn from_result(result: &Result<Job, ServiceError>) -> Self {
        match result {
            Ok(job) => JobDetailView::Loaded(job.clone()),
            Err(error) => Self::from_error(error),
        }
    }

    pub fn can_retry(&self) -> bool {
        matches!(self, JobDetailView::Failed { .. })
    }

    fn from_error(error: &ServiceError) -> Self {
        if error.is_not_found() {
            JobDetailView::NotFound
        } else {
            JobDetailView::Failed {
                kind: error.kind,
                message: error.message.clone(),
            }
        }
    }
}
