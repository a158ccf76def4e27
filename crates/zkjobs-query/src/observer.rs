//! Consumer handles on cache entries.

use tokio::sync::watch;
use zkjobs_models::RequestKey;

use crate::snapshot::QuerySnapshot;

/// A mounted consumer of one cache entry.
///
/// Dropping the observer unmounts it: updates are no longer delivered to it,
/// while any fetch it started still runs to completion and fills the cache.
pub struct QueryObserver<T, E> {
    key: RequestKey,
    receiver: watch::Receiver<QuerySnapshot<T, E>>,
}

impl<T: Clone, E: Clone> QueryObserver<T, E> {
    pub(crate) fn new(key: RequestKey, receiver: watch::Receiver<QuerySnapshot<T, E>>) -> Self {
        Self { key, receiver }
    }

    pub fn key(&self) -> &RequestKey {
        &self.key
    }

    /// Latest state of the entry.
    pub fn snapshot(&self) -> QuerySnapshot<T, E> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next state change. `None` once the entry has been removed
    /// from the cache.
    pub async fn changed(&mut self) -> Option<QuerySnapshot<T, E>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Wait until the entry is in success or error state.
    pub async fn settled(&mut self) -> Option<QuerySnapshot<T, E>> {
        loop {
            let snapshot = self.receiver.borrow_and_update().clone();
            if snapshot.status.is_settled() {
                return Some(snapshot);
            }
            self.receiver.changed().await.ok()?;
        }
    }
}
