//! Shared data models for the zkjobs board.
//!
//! This crate provides Serde-serializable types for:
//! - Job postings and their pass/fail criteria
//! - Response envelopes and pagination metadata
//! - Job filters, canonical query strings and request keys
//! - A seeded synthetic catalog used by the API server and the mock network

pub mod catalog;
pub mod envelope;
pub mod filter;
pub mod job;

// Re-export common types
pub use catalog::{JobCatalog, REMOTE_LOCATION};
pub use envelope::{ApiEnvelope, PageMeta, PaginatedResponse};
pub use filter::{JobFilter, QueryParams, RequestKey, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use job::{Criterion, CriterionStatus, Job, JobId};
