//! Application state.

use std::sync::Arc;

use tracing::info;
use zkjobs_models::JobCatalog;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub catalog: Arc<JobCatalog>,
}

impl AppState {
    /// State serving the synthetic catalog described by `config`.
    pub fn new(config: ApiConfig) -> Self {
        let catalog = JobCatalog::generate(config.catalog_seed, config.catalog_size);
        info!(
            seed = config.catalog_seed,
            jobs = catalog.len(),
            "Generated job catalog"
        );
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(config: ApiConfig, catalog: JobCatalog) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
        }
    }
}
