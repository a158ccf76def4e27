//! Query cache for the zkjobs client.
//!
//! This crate provides:
//! - `QueryCache`: request-keyed cache with in-flight deduplication,
//!   stale-while-revalidate and latest-wins ordering
//! - `QueryObserver`: a mounted consumer of one cache entry
//! - `JobQueries`: job listings and details bound to `JobsService`
//! - `JobListView` / `JobDetailView`: states rendering code switches on

pub mod cache;
pub mod config;
pub mod jobs;
pub mod metrics;
pub mod observer;
pub mod snapshot;
pub mod view;

pub use cache::{QueryCache, QueryValue};
pub use config::QueryConfig;
pub use jobs::{JobDetailCache, JobListCache, JobQueries};
pub use observer::QueryObserver;
pub use snapshot::{QuerySnapshot, QueryStatus};
pub use view::{JobDetailView, JobListView};
