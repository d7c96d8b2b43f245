// In-memory query cache with request deduplication and prefetch.
// Fetches run as tokio tasks; results come back over a channel and are applied
// on the owning thread, so entries are only ever mutated in one place.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::hash::Hash;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use super::entry::{CacheEntry, QueryOptions};

/// What a view should render for a key. First match wins: loading, error, ready.
#[derive(Debug, PartialEq, Eq)]
pub enum QueryState<'a, V> {
    /// No data yet and a fetch is pending.
    Loading,
    /// The last fetch failed.
    Error(&'a str),
    /// Data is available. `is_fetching` is set during a background refetch.
    Ready { data: &'a V, is_fetching: bool },
}

impl<'a, V> QueryState<'a, V> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&'a V> {
        match self {
            QueryState::Ready { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Completed fetch reported by a spawned task.
#[derive(Debug)]
struct Resolution<K, V> {
    key: K,
    fetch_id: u64,
    result: Result<V, String>,
}

/// Query cache keyed by `K`, holding values of type `V`.
pub struct QueryCache<K, V> {
    name: &'static str,
    entries: HashMap<K, CacheEntry<V>>,
    tx: UnboundedSender<Resolution<K, V>>,
    rx: UnboundedReceiver<Resolution<K, V>>,
    in_flight: usize,
    next_fetch_id: u64,
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Clone + Eq + Hash + Debug + Send + 'static,
    V: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Clone + Eq + Hash + Debug + Send + 'static,
    V: Send + 'static,
{
    pub fn new() -> Self {
        Self::named("query")
    }

    /// Create a cache whose log lines carry `name` as the resource kind.
    pub fn named(name: &'static str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            name,
            entries: HashMap::new(),
            tx,
            rx,
            in_flight: 0,
            next_fetch_id: 0,
        }
    }

    /// Resolve `key` for a view.
    ///
    /// Starts a fetch when there is no data yet (the view sees `Loading`), or
    /// when the cached data is stale (the view keeps seeing the cached data while
    /// it revalidates). Never starts a second fetch for a key already in flight.
    /// Returns whether a fetch was started.
    pub fn ensure<F, Fut, E>(&mut self, key: K, options: QueryOptions, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: Display,
    {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(options));
        entry.observed = true;
        entry.options = options;

        let should_fetch = !entry.is_fetching && (entry.data.is_none() || entry.is_stale());
        if !should_fetch {
            debug!(query = self.name, ?key, fetching = entry.is_fetching, "query cache hit");
            return false;
        }

        if entry.data.is_none() {
            entry.error = None;
        }
        debug!(query = self.name, ?key, background = entry.data.is_some(), "fetching query");
        self.start_fetch(key, fetch());
        true
    }

    /// Populate `key` ahead of use.
    ///
    /// Does nothing when the key is in flight or holds data fresh under
    /// `options`. Failures are never surfaced to a caller: if no view has
    /// resolved the key by the time the fetch fails, the failure is logged and
    /// dropped, so the first real visit fetches again.
    pub fn prefetch<F, Fut, E>(&mut self, key: K, options: QueryOptions, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: Display,
    {
        let should_fetch = match self.entries.get(&key) {
            None => true,
            Some(entry) => {
                !entry.is_fetching
                    && (entry.data.is_none() || entry.is_stale_after(options.stale_time))
            }
        };
        if !should_fetch {
            return false;
        }

        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(options));
        if entry.data.is_none() {
            entry.error = None;
        }
        debug!(query = self.name, ?key, "prefetching query");
        self.start_fetch(key, fetch());
        true
    }

    /// Force a background refetch of `key`, keeping cached data visible.
    /// Returns false when a fetch is already in flight.
    pub fn refetch<F, Fut, E>(&mut self, key: K, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: Display,
    {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(QueryOptions::default()));
        if entry.is_fetching {
            return false;
        }
        entry.observed = true;
        if entry.data.is_none() {
            entry.error = None;
        }
        self.start_fetch(key, fetch());
        true
    }

    fn start_fetch<Fut, E>(&mut self, key: K, fut: Fut)
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: Display,
    {
        self.next_fetch_id += 1;
        let fetch_id = self.next_fetch_id;

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.is_fetching = true;
            entry.fetch_id = fetch_id;
        }
        self.in_flight += 1;

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fut.await.map_err(|e| e.to_string());
            // The receiver lives as long as the cache; a send error means it is gone.
            let _ = tx.send(Resolution {
                key,
                fetch_id,
                result,
            });
        });
    }

    /// Apply every completed fetch. Returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(resolution) = self.rx.try_recv() {
            self.apply(resolution);
            applied += 1;
        }
        applied
    }

    /// Wait until no fetch is in flight, applying results as they arrive.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.rx.recv().await {
                Some(resolution) => self.apply(resolution),
                None => break,
            }
        }
    }

    fn apply(&mut self, resolution: Resolution<K, V>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        let Resolution {
            key,
            fetch_id,
            result,
        } = resolution;

        let Some(entry) = self.entries.get_mut(&key) else {
            debug!(query = self.name, ?key, "dropping result for evicted query");
            return;
        };
        if entry.fetch_id != fetch_id {
            debug!(query = self.name, ?key, "dropping result of superseded fetch");
            return;
        }

        match result {
            Ok(data) => {
                debug!(query = self.name, ?key, "query resolved");
                entry.resolve(data);
            }
            Err(error) if entry.observed => {
                warn!(query = self.name, ?key, %error, "query failed");
                entry.fail(error);
            }
            Err(error) => {
                warn!(query = self.name, ?key, %error, "prefetch failed, ignoring");
                entry.is_fetching = false;
                if entry.data.is_none() {
                    self.entries.remove(&key);
                }
            }
        }
    }

    /// Snapshot of `key` for rendering. `None` if never requested.
    pub fn state(&self, key: &K) -> Option<QueryState<'_, V>> {
        let entry = self.entries.get(key)?;
        let state = match (&entry.data, &entry.error) {
            (None, None) => QueryState::Loading,
            (_, Some(error)) => QueryState::Error(error),
            (Some(data), None) => QueryState::Ready {
                data,
                is_fetching: entry.is_fetching,
            },
        };
        Some(state)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of fetches whose results have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Evict `key`. A fetch still in flight for it is applied nowhere.
    pub fn remove(&mut self, key: &K) -> Option<CacheEntry<V>> {
        self.entries.remove(key)
    }

    /// Push an entry's fetch time into the past.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, key: &K, by: chrono::Duration) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.fetched_at = entry.fetched_at.map(|t| t - by);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const TWO_SECONDS: QueryOptions = QueryOptions::stale_after(Duration::from_millis(2000));

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        value: &'static str,
    ) -> impl FnOnce() -> std::future::Ready<Result<String, String>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(value.to_string()))
        }
    }

    fn failing_fetch(
        calls: &Arc<AtomicUsize>,
    ) -> impl FnOnce() -> std::future::Ready<Result<String, String>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Err("HTTP 500: server error".to_string()))
        }
    }

    #[tokio::test]
    async fn test_first_resolution_is_loading_then_ready() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        assert!(cache.state(&1).is_none());
        assert!(cache.ensure(1, TWO_SECONDS, counting_fetch(&calls, "page one")));
        assert_eq!(cache.state(&1), Some(QueryState::Loading));

        cache.settle().await;
        assert_eq!(cache.state(&1).and_then(|s| s.data()).unwrap(), "page one");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_in_flight_requests_are_deduplicated() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.ensure(1, TWO_SECONDS, counting_fetch(&calls, "a"));
        assert!(!cache.ensure(1, TWO_SECONDS, counting_fetch(&calls, "b")));
        assert!(!cache.prefetch(1, TWO_SECONDS, counting_fetch(&calls, "c")));
        assert_eq!(cache.in_flight(), 1);

        cache.settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.state(&1).and_then(|s| s.data()).unwrap(), "a");
    }

    #[tokio::test]
    async fn test_fresh_data_is_served_without_fetch() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.ensure(1, TWO_SECONDS, counting_fetch(&calls, "a"));
        cache.settle().await;

        assert!(!cache.ensure(1, TWO_SECONDS, counting_fetch(&calls, "b")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_data_refetches_in_background() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.ensure(1, TWO_SECONDS, counting_fetch(&calls, "old"));
        cache.settle().await;
        cache.backdate(&1, chrono::Duration::milliseconds(2500));

        assert!(cache.ensure(1, TWO_SECONDS, counting_fetch(&calls, "new")));
        assert_eq!(
            cache.state(&1),
            Some(QueryState::Ready {
                data: &"old".to_string(),
                is_fetching: true
            })
        );

        cache.settle().await;
        assert_eq!(
            cache.state(&1),
            Some(QueryState::Ready {
                data: &"new".to_string(),
                is_fetching: false
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_observed_failure_surfaces_error() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.ensure(3, TWO_SECONDS, failing_fetch(&calls));
        cache.settle().await;

        assert_eq!(
            cache.state(&3),
            Some(QueryState::Error("HTTP 500: server error"))
        );
    }

    #[tokio::test]
    async fn test_revisiting_failed_query_fetches_again() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.ensure(3, TWO_SECONDS, failing_fetch(&calls));
        cache.settle().await;

        assert!(cache.ensure(3, TWO_SECONDS, counting_fetch(&calls, "ok")));
        assert_eq!(cache.state(&3), Some(QueryState::Loading));
        cache.settle().await;
        assert_eq!(cache.state(&3).and_then(|s| s.data()).unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_unobserved_prefetch_failure_is_swallowed() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        assert!(cache.prefetch(2, TWO_SECONDS, failing_fetch(&calls)));
        cache.settle().await;

        assert!(!cache.contains(&2));
        assert!(cache.state(&2).is_none());

        // The real visit fetches normally.
        assert!(cache.ensure(2, TWO_SECONDS, counting_fetch(&calls, "page two")));
        assert_eq!(cache.state(&2), Some(QueryState::Loading));
    }

    #[tokio::test]
    async fn test_prefetch_observed_before_failure_reports_error() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.prefetch(2, TWO_SECONDS, failing_fetch(&calls));
        // A view reaches the page while the prefetch is still pending.
        assert!(!cache.ensure(2, TWO_SECONDS, counting_fetch(&calls, "unused")));
        cache.settle().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(cache.state(&2), Some(QueryState::Error(_))));
    }

    #[tokio::test]
    async fn test_prefetch_skips_fresh_entry() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.prefetch(2, TWO_SECONDS, counting_fetch(&calls, "a"));
        cache.settle().await;
        assert!(!cache.prefetch(2, TWO_SECONDS, counting_fetch(&calls, "b")));

        cache.backdate(&2, chrono::Duration::seconds(5));
        assert!(cache.prefetch(2, TWO_SECONDS, counting_fetch(&calls, "c")));
        cache.settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_never_stale_entry_is_fetched_once() {
        let mut cache: QueryCache<u64, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.ensure(7, QueryOptions::never_stale(), counting_fetch(&calls, "comments"));
        cache.settle().await;
        cache.backdate(&7, chrono::Duration::hours(1));

        for _ in 0..3 {
            cache.ensure(7, QueryOptions::never_stale(), counting_fetch(&calls, "again"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_result_for_evicted_key_is_dropped() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.ensure(1, TWO_SECONDS, counting_fetch(&calls, "first"));
        cache.remove(&1);
        cache.ensure(1, TWO_SECONDS, counting_fetch(&calls, "second"));
        cache.settle().await;

        assert_eq!(cache.in_flight(), 0);
        assert_eq!(cache.state(&1).and_then(|s| s.data()).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_drain_applies_completed_fetches() {
        let mut cache: QueryCache<u32, String> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.ensure(1, TWO_SECONDS, counting_fetch(&calls, "a"));
        cache.ensure(2, TWO_SECONDS, counting_fetch(&calls, "b"));

        let mut applied = 0;
        while applied < 2 {
            tokio::task::yield_now().await;
            applied += cache.drain();
        }
        assert_eq!(cache.in_flight(), 0);
        assert!(cache.state(&1).unwrap().data().is_some());
        assert!(cache.state(&2).unwrap().data().is_some());
    }
}
