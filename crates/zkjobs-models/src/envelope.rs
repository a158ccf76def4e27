//! Response envelopes shared by the API server and its clients.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageMeta {
    /// Items matching the filter before pagination
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// A page of results.
///
/// `data.len() <= meta.limit` always holds for pages built through
/// [`PaginatedResponse::from_slice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub success: bool,
    pub meta: PageMeta,
}

impl<T: Clone> PaginatedResponse<T> {
    /// Cut a successful page out of an already filtered and sorted slice.
    pub fn from_slice(items: &[T], limit: usize, offset: usize) -> Self {
        let data = items.iter().skip(offset).take(limit).cloned().collect();
        Self {
            data,
            success: true,
            meta: PageMeta {
                total: items.len(),
                limit,
                offset,
            },
        }
    }
}

/// Wire shape of every API response body.
///
/// `data` is present on success, `error` carries a message otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApiEnvelope<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            meta: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<PaginatedResponse<T>> for ApiEnvelope<Vec<T>> {
    fn from(page: PaginatedResponse<T>) -> Self {
        Self {
            success: page.success,
            data: Some(page.data),
            meta: Some(page.meta),
            error: None,
        }
    }
}
