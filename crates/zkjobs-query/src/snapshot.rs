//! Observable state of one cache entry.

use tokio::time::Instant;

/// Lifecycle of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryStatus {
    /// Never requested
    #[default]
    Idle,
    /// A fetch is in flight
    Pending,
    Success,
    Error,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Idle => "idle",
            QueryStatus::Pending => "pending",
            QueryStatus::Success => "success",
            QueryStatus::Error => "error",
        }
    }

    /// Success or error.
    pub fn is_settled(&self) -> bool {
        matches!(self, QueryStatus::Success | QueryStatus::Error)
    }
}

/// What consumers of an entry see.
///
/// `data` survives refetches and failed refetches, so a consumer can keep
/// rendering the last good value while a newer one is loading.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot<T, E> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<E>,
    /// When the last applied response arrived
    pub fetched_at: Option<Instant>,
}

impl<T, E> QuerySnapshot<T, E> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            fetched_at: None,
        }
    }

    /// First load: pending with nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Pending && self.data.is_none()
    }

    /// Background refresh while the last value is still shown.
    pub fn is_refetching(&self) -> bool {
        self.status == QueryStatus::Pending && self.data.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

impl<T: Clone, E: Clone> QuerySnapshot<T, E> {
    /// The value a caller should receive right now, if any.
    pub fn current_result(&self) -> Option<Result<T, E>> {
        match (self.status, &self.error, &self.data) {
            (QueryStatus::Error, Some(error), _) => Some(Err(error.clone())),
            (_, _, Some(data)) => Some(Ok(data.clone())),
            _ => None,
        }
    }
}

impl<T, E> Default for QuerySnapshot<T, E> {
    fn default() -> Self {
        Self::idle()
    }
}
