//! The query cache: one entry per [`QueryKey`], owned by a single
//! long-lived instance and shared by reference.
//!
//! Reads join an in-flight fetch for the same key instead of starting a
//! second one. Writes always run and, on success, mark the dependent
//! entries stale so the next read goes back to the service.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use earlycare_gateway::GatewayError;

use crate::error::QueryError;
use crate::keys::{MutationKey, QueryKey};
use crate::state::QueryState;

type CachedValue = Arc<dyn Any + Send + Sync>;
type FetchOutcome = Result<CachedValue, QueryError>;
type InFlight = Shared<BoxFuture<'static, FetchOutcome>>;

#[derive(Default)]
struct Entry {
    value: Option<CachedValue>,
    error: Option<QueryError>,
    fetched: bool,
    stale: bool,
    in_flight: Option<InFlight>,
    /// Reassigned whenever a fetch starts or the entry is invalidated, so a
    /// fetch that finishes after invalidation cannot overwrite newer state.
    /// Drawn from the cache-wide counter, never reused after a clear.
    generation: u64,
}

enum ReadPlan {
    Cached(FetchOutcome),
    Await(InFlight, u64),
}

#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    generations: AtomicU64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `key`, invoking `fetcher` only if there is neither a fetch in
    /// flight nor a fresh cached outcome.
    ///
    /// A cached error is returned as-is; failed reads are not retried until
    /// the entry is invalidated or [`refetch`](Self::refetch)ed.
    pub async fn read<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, QueryError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>> + Send + 'static,
    {
        let plan = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key).or_default();

            if let Some(in_flight) = &entry.in_flight {
                debug!(key = %key, "joining in-flight fetch");
                ReadPlan::Await(in_flight.clone(), entry.generation)
            } else if entry.fetched && !entry.stale {
                debug!(key = %key, "cache hit");
                ReadPlan::Cached(cached_outcome(key, entry))
            } else {
                debug!(key = %key, stale = entry.stale, "fetching");
                let fut = fetcher();
                let shared = async move {
                    fut.await
                        .map(|v| Arc::new(v) as CachedValue)
                        .map_err(QueryError::from)
                }
                .boxed()
                .shared();
                entry.generation = self.next_generation();
                entry.in_flight = Some(shared.clone());
                ReadPlan::Await(shared, entry.generation)
            }
        };

        let outcome = match plan {
            ReadPlan::Cached(outcome) => outcome,
            ReadPlan::Await(in_flight, generation) => {
                let outcome = in_flight.await;
                self.settle(key, generation, &outcome).await;
                outcome
            }
        };

        outcome.and_then(|value| downcast(key, &value))
    }

    /// Invalidate `key` and read it again.
    pub async fn refetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, QueryError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>> + Send + 'static,
    {
        self.invalidate(key).await;
        self.read(key, fetcher).await
    }

    /// Run a remote write. On success every entry in
    /// [`MutationKey::invalidates`] is marked stale; on failure nothing is.
    pub async fn write<T, F, Fut>(&self, key: MutationKey, fetcher: F) -> Result<T, QueryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        match fetcher().await {
            Ok(value) => {
                for dependent in key.invalidates() {
                    self.invalidate(*dependent).await;
                }
                info!(mutation = %key, "write succeeded");
                Ok(value)
            }
            Err(e) => {
                warn!(mutation = %key, error = %e, "write failed");
                Err(QueryError::from(e))
            }
        }
    }

    /// Mark `key` stale. The cached value is kept for display but the next
    /// read fetches again. Any fetch still in flight is detached: callers
    /// already waiting on it get its result, later reads do not.
    pub async fn invalidate(&self, key: QueryKey) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(&key) {
            entry.stale = true;
            entry.in_flight = None;
            entry.generation = self.next_generation();
            debug!(key = %key, "invalidated");
        }
    }

    /// Drop every entry, e.g. when the signed-in identity changes. Fetches
    /// still in flight are detached and never settle into the new entries.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
        debug!("cache cleared");
    }

    /// The current state of `key` without triggering a fetch.
    pub async fn snapshot<T>(&self, key: QueryKey) -> QueryState<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries.lock().await;
        let Some(entry) = entries.get(&key) else {
            return QueryState::Unloaded;
        };

        if entry.in_flight.is_some() && entry.value.is_none() {
            QueryState::Loading
        } else if let Some(err) = &entry.error {
            QueryState::Errored(err.clone())
        } else if let Some(value) = &entry.value {
            downcast(key, value).into()
        } else if entry.in_flight.is_some() {
            QueryState::Loading
        } else {
            QueryState::Unloaded
        }
    }

    /// Whether `key` has completed at least one fetch (successful or not).
    pub async fn is_fetched(&self, key: QueryKey) -> bool {
        self.entries
            .lock()
            .await
            .get(&key)
            .is_some_and(|e| e.fetched)
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn settle(&self, key: QueryKey, generation: u64, outcome: &FetchOutcome) {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.get_mut(&key) else {
            return;
        };
        // Already settled by another joiner, or superseded by invalidation.
        if entry.generation != generation || entry.in_flight.is_none() {
            return;
        }

        entry.in_flight = None;
        entry.fetched = true;
        entry.stale = false;
        match outcome {
            Ok(value) => {
                entry.value = Some(Arc::clone(value));
                entry.error = None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "read failed");
                entry.error = Some(e.clone());
            }
        }
    }
}

fn cached_outcome(key: QueryKey, entry: &Entry) -> FetchOutcome {
    match (&entry.error, &entry.value) {
        (Some(err), _) => Err(err.clone()),
        (None, Some(value)) => Ok(Arc::clone(value)),
        (None, None) => Err(QueryError::TypeMismatch(key)),
    }
}

fn downcast<T: Clone + 'static>(key: QueryKey, value: &CachedValue) -> Result<T, QueryError> {
    (**value)
        .downcast_ref::<T>()
        .cloned()
        .ok_or(QueryError::TypeMismatch(key))
}
