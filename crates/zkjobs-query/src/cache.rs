//! Request-keyed query cache.
//!
//! Each [`RequestKey`] owns one entry moving through
//! `idle -> pending -> success | error`. The cache guarantees:
//! - at most one fetch in flight per key; later callers join it
//! - stale-while-revalidate: stale values are served while a background
//!   fetch refreshes them
//! - latest wins: every fetch gets a sequence number and a response is only
//!   applied when it is newer than the last applied one
//! - fetches run on their own task, so they complete and fill the cache even
//!   when every caller and observer has gone away
//!
//! The entry map sits behind a mutex that is never held across an await.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tracing::debug;
use zkjobs_models::RequestKey;

use crate::config::QueryConfig;
use crate::metrics::{record_evictions, record_lookup};
use crate::observer::QueryObserver;
use crate::snapshot::{QuerySnapshot, QueryStatus};

/// Bounds for cached values and errors.
pub trait QueryValue: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> QueryValue for T {}

type SharedFetch<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

type Entries<T, E> = Arc<Mutex<HashMap<RequestKey, Entry<T, E>>>>;

struct InFlight<T, E> {
    seq: u64,
    future: SharedFetch<T, E>,
}

struct Entry<T, E> {
    state: watch::Sender<QuerySnapshot<T, E>>,
    in_flight: Option<InFlight<T, E>>,
    /// Sequence number of the last applied response. Starts at the cache
    /// counter value when the entry was created, so fetches issued for an
    /// earlier, removed entry can never apply.
    applied_seq: u64,
    invalidated: bool,
}

impl<T: QueryValue, E: QueryValue> Entry<T, E> {
    fn new(created_seq: u64) -> Self {
        let (state, _) = watch::channel(QuerySnapshot::idle());
        Self {
            state,
            in_flight: None,
            applied_seq: created_seq,
            invalidated: false,
        }
    }

    fn is_stale(&self, config: &QueryConfig, now: Instant) -> bool {
        if self.invalidated {
            return true;
        }
        match self.state.borrow().fetched_at {
            Some(at) => now.duration_since(at) >= config.stale_time,
            None => true,
        }
    }
}

/// Shared query cache. Cloning is cheap and every clone sees the same
/// entries.
pub struct QueryCache<T, E> {
    entries: Entries<T, E>,
    seq: Arc<AtomicU64>,
    config: QueryConfig,
}

impl<T, E> Clone for QueryCache<T, E> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            seq: Arc::clone(&self.seq),
            config: self.config,
        }
    }
}

impl<T: QueryValue, E: QueryValue> QueryCache<T, E> {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            seq: Arc::new(AtomicU64::new(0)),
            config,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Resolve `key`, fetching with `fetcher` only when needed.
    ///
    /// - fresh success: cached value, no fetch
    /// - stale value: cached value now, refetch in the background
    /// - fetch in flight: join it (or return the value it is refreshing)
    /// - fresh error: cached error, no fetch
    /// - otherwise: start a fetch and wait for it
    pub async fn fetch<F, Fut>(&self, key: RequestKey, fetcher: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let pending = {
            let mut entries = self.entries.lock().await;
            let entry = self.entry(&mut entries, &key);
            let stale = entry.is_stale(&self.config, Instant::now());
            let snapshot = entry.state.borrow().clone();

            if let Some(in_flight) = &entry.in_flight {
                if let Some(data) = snapshot.data {
                    record_lookup("revalidate");
                    return Ok(data);
                }
                record_lookup("dedup");
                debug!(key = %key, seq = in_flight.seq, "Joining in-flight fetch");
                in_flight.future.clone()
            } else {
                match (snapshot.status, snapshot.data, snapshot.error) {
                    (QueryStatus::Success, Some(data), _) if !stale => {
                        record_lookup("hit");
                        return Ok(data);
                    }
                    (QueryStatus::Success | QueryStatus::Error, Some(data), _) if stale => {
                        record_lookup("revalidate");
                        debug!(key = %key, "Serving stale value while refetching");
                        self.start_fetch(entry, &key, fetcher);
                        return Ok(data);
                    }
                    (QueryStatus::Error, _, Some(error)) if !stale => {
                        record_lookup("error_hit");
                        return Err(error);
                    }
                    _ => {
                        record_lookup("fetch");
                        self.start_fetch(entry, &key, fetcher)
                    }
                }
            }
        };

        pending.await
    }

    /// Force a new fetch for `key`, even if one is already in flight, and
    /// wait for it. Used by retry affordances.
    pub async fn refetch<F, Fut>(&self, key: RequestKey, fetcher: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let pending = {
            let mut entries = self.entries.lock().await;
            let entry = self.entry(&mut entries, &key);
            record_lookup("refetch");
            self.start_fetch(entry, &key, fetcher)
        };

        pending.await
    }

    /// Mount a consumer on `key`, starting a background fetch when the entry
    /// is idle or stale and nothing is in flight.
    pub async fn query<F, Fut>(&self, key: RequestKey, fetcher: F) -> QueryObserver<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let mut entries = self.entries.lock().await;
        let entry = self.entry(&mut entries, &key);

        if entry.in_flight.is_none() && entry.is_stale(&self.config, Instant::now()) {
            record_lookup("fetch");
            self.start_fetch(entry, &key, fetcher);
        }

        QueryObserver::new(key, entry.state.subscribe())
    }

    /// Current state of `key`; idle when unknown.
    pub async fn snapshot(&self, key: &RequestKey) -> QuerySnapshot<T, E> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .map(|entry| entry.state.borrow().clone())
            .unwrap_or_default()
    }

    /// Mark `key` stale so the next access refetches it.
    pub async fn invalidate(&self, key: &RequestKey) {
        if let Some(entry) = self.entries.lock().await.get_mut(key) {
            entry.invalidated = true;
        }
    }

    /// Mark every entry of `resource` stale.
    pub async fn invalidate_resource(&self, resource: &str) {
        let mut entries = self.entries.lock().await;
        for (key, entry) in entries.iter_mut() {
            if key.resource_name() == resource {
                entry.invalidated = true;
            }
        }
    }

    /// Drop `key`. Observers see their stream end; an in-flight fetch still
    /// completes but its result is discarded.
    pub async fn remove(&self, key: &RequestKey) -> bool {
        self.entries.lock().await.remove(key).is_some()
    }

    /// Evict entries that have no observers, no fetch in flight and were last
    /// filled more than `gc_time` ago. Returns the number evicted.
    pub async fn collect_garbage(&self) -> usize {
        let now = Instant::now();
        let gc_time = self.config.gc_time;
        let mut entries = self.entries.lock().await;
        let before = entries.len();

        entries.retain(|key, entry| {
            let recent = entry
                .state
                .borrow()
                .fetched_at
                .is_some_and(|at| now.duration_since(at) < gc_time);
            let keep = entry.in_flight.is_some() || entry.state.receiver_count() > 0 || recent;
            if !keep {
                debug!(key = %key, "Evicting cache entry");
            }
            keep
        });

        let evicted = before - entries.len();
        if evicted > 0 {
            record_evictions(evicted);
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    fn entry<'a>(
        &self,
        entries: &'a mut HashMap<RequestKey, Entry<T, E>>,
        key: &RequestKey,
    ) -> &'a mut Entry<T, E> {
        let created_seq = self.seq.load(Ordering::SeqCst);
        entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(created_seq))
    }

    /// Start a fetch on its own task and register it as the entry's
    /// in-flight fetch.
    fn start_fetch<F, Fut>(
        &self,
        entry: &mut Entry<T, E>,
        key: &RequestKey,
        fetcher: F,
    ) -> SharedFetch<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        entry.invalidated = false;
        entry.state.send_modify(|s| s.status = QueryStatus::Pending);

        let entries = Arc::clone(&self.entries);
        let task_key = key.clone();
        let future = async move {
            let result = fetcher().await;
            settle(&entries, &task_key, seq, result).await
        }
        .boxed()
        .shared();

        entry.in_flight = Some(InFlight {
            seq,
            future: future.clone(),
        });
        tokio::spawn(future.clone());

        debug!(key = %key, seq, "Started fetch");
        future
    }
}

/// Apply a finished fetch to its entry and return the value callers should
/// see: the fetched result, or the newer cached state when this response was
/// superseded.
async fn settle<T: QueryValue, E: QueryValue>(
    entries: &Mutex<HashMap<RequestKey, Entry<T, E>>>,
    key: &RequestKey,
    seq: u64,
    result: Result<T, E>,
) -> Result<T, E> {
    let mut entries = entries.lock().await;
    let Some(entry) = entries.get_mut(key) else {
        return result;
    };

    if entry.in_flight.as_ref().is_some_and(|f| f.seq == seq) {
        entry.in_flight = None;
    }

    if seq <= entry.applied_seq {
        record_lookup("superseded");
        debug!(
            key = %key,
            seq,
            applied_seq = entry.applied_seq,
            "Discarding superseded response"
        );
        let current = entry.state.borrow().current_result();
        return current.unwrap_or(result);
    }

    entry.applied_seq = seq;
    let still_fetching = entry.in_flight.is_some();
    let fetched_at = Instant::now();

    entry.state.send_modify(|s| {
        match &result {
            Ok(data) => {
                s.status = QueryStatus::Success;
                s.data = Some(data.clone());
                s.error = None;
            }
            Err(error) => {
                s.status = QueryStatus::Error;
                s.error = Some(error.clone());
            }
        }
        if still_fetching {
            s.status = QueryStatus::Pending;
        }
        s.fetched_at = Some(fetched_at);
    });

    result
}
