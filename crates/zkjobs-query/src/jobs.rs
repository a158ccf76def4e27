//! Job queries bound to the shared caches.

use futures::future::{BoxFuture, FutureExt};
use zkjobs_client::{JobsService, ServiceError, ServiceResult, JOBS_RESOURCE};
use zkjobs_models::{Job, JobFilter, RequestKey};

use crate::cache::QueryCache;
use crate::config::QueryConfig;
use crate::observer::QueryObserver;

pub type JobListCache = QueryCache<Vec<Job>, ServiceError>;
pub type JobDetailCache = QueryCache<Job, ServiceError>;

/// Session-wide entry point for job data.
///
/// Holds one cache for listings and one for single postings. Clones share
/// both caches and the underlying service.
#[derive(Clone)]
pub struct JobQueries {
    service: JobsService,
    lists: JobListCache,
    details: JobDetailCache,
}

impl JobQueries {
    pub fn new(service: JobsService, config: QueryConfig) -> Self {
        Self {
            service,
            lists: QueryCache::new(config),
            details: QueryCache::new(config),
        }
    }

    pub fn service(&self) -> &JobsService {
        &self.service
    }

    pub fn lists(&self) -> &JobListCache {
        &self.lists
    }

    pub fn details(&self) -> &JobDetailCache {
        &self.details
    }

    /// Cache key of a listing.
    pub fn list_key(filter: &JobFilter) -> RequestKey {
        filter.request_key(JOBS_RESOURCE)
    }

    /// Cache key of a single posting. The id is encoded as on the wire.
    pub fn detail_key(id: &str) -> RequestKey {
        RequestKey::resource(format!(
            "{}/{}",
            JOBS_RESOURCE,
            urlencoding::encode(id.trim())
        ))
    }

    // =========================================================================
    // Listings
    // =========================================================================

    pub async fn jobs(&self, filter: &JobFilter) -> ServiceResult<Vec<Job>> {
        let (key, fetcher) = self.list_fetch(filter.clone());
        self.lists.fetch(key, fetcher).await
    }

    /// Listing for `query` on top of `filter`. `filter` is left untouched.
    pub async fn search(&self, query: &str, filter: &JobFilter) -> ServiceResult<Vec<Job>> {
        self.jobs(&filter.clone().with_search(query)).await
    }

    /// Re-issue the listing request even if a cached or pending result exists.
    pub async fn retry_jobs(&self, filter: &JobFilter) -> ServiceResult<Vec<Job>> {
        let (key, fetcher) = self.list_fetch(filter.clone());
        self.lists.refetch(key, fetcher).await
    }

    /// Mount a listing consumer, fetching in the background when needed.
    pub async fn watch_jobs(&self, filter: &JobFilter) -> QueryObserver<Vec<Job>, ServiceError> {
        let (key, fetcher) = self.list_fetch(filter.clone());
        self.lists.query(key, fetcher).await
    }

    /// Mark every cached listing stale.
    pub async fn invalidate_jobs(&self) {
        self.lists.invalidate_resource(JOBS_RESOURCE).await;
    }

    // =========================================================================
    // Details
    // =========================================================================

    pub async fn job(&self, id: &str) -> ServiceResult<Job> {
        let (key, fetcher) = self.detail_fetch(id);
        self.details.fetch(key, fetcher).await
    }

    pub async fn retry_job(&self, id: &str) -> ServiceResult<Job> {
        let (key, fetcher) = self.detail_fetch(id);
        self.details.refetch(key, fetcher).await
    }

    pub async fn watch_job(&self, id: &str) -> QueryObserver<Job, ServiceError> {
        let (key, fetcher) = self.detail_fetch(id);
        self.details.query(key, fetcher).await
    }

    /// Evict unobserved, expired entries from both caches.
    pub async fn collect_garbage(&self) -> usize {
        self.lists.collect_garbage().await + self.details.collect_garbage().await
    }

    fn list_fetch(
        &self,
        filter: JobFilter,
    ) -> (
        RequestKey,
        impl FnOnce() -> BoxFuture<'static, ServiceResult<Vec<Job>>> + Send + 'static,
    ) {
        let key = Self::list_key(&filter);
        let service = self.service.clone();
        let fetcher = move || async move { service.get_jobs(&filter).await }.boxed();
        (key, fetcher)
    }

    fn detail_fetch(
        &self,
        id: &str,
    ) -> (
        RequestKey,
        impl FnOnce() -> BoxFuture<'static, ServiceResult<Job>> + Send + 'static,
    ) {
        let key = Self::detail_key(id);
        let service = self.service.clone();
        let id = id.to_string();
        let fetcher = move || async move { service.get_job(&id).await }.boxed();
        (key, fetcher)
    }
}
