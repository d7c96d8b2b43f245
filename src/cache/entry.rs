// Cache entry for a single query key.
// Tracks fetched data, its age, the last error, and whether a fetch is in flight.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Per-query cache behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Age after which cached data is eligible for background refetch.
    /// `None` means the data never goes stale.
    pub stale_time: Option<Duration>,
}

impl QueryOptions {
    /// Data older than `stale_time` is refetched on next access.
    pub const fn stale_after(stale_time: Duration) -> Self {
        Self {
            stale_time: Some(stale_time),
        }
    }

    /// Data is fetched once and served for the rest of the session.
    pub const fn never_stale() -> Self {
        Self { stale_time: None }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::stale_after(Duration::ZERO)
    }
}

/// Cached state for one key.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Last successfully fetched data.
    pub data: Option<V>,
    /// When `data` was fetched.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Stringified error of the last failed fetch, cleared on success.
    pub error: Option<String>,
    /// Whether a fetch for this key is in flight.
    pub is_fetching: bool,
    /// Whether a view has resolved this key (as opposed to a prefetch only).
    pub observed: bool,
    /// Options of the most recent resolution.
    pub options: QueryOptions,
    /// Id of the fetch whose result this entry is waiting for.
    pub(crate) fetch_id: u64,
}

impl<V> CacheEntry<V> {
    /// Create an empty entry with no data.
    pub fn new(options: QueryOptions) -> Self {
        Self {
            data: None,
            fetched_at: None,
            error: None,
            is_fetching: false,
            observed: false,
            options,
            fetch_id: 0,
        }
    }

    /// Check if the data is older than the given stale time.
    /// Entries without data are always stale.
    pub fn is_stale_after(&self, stale_time: Option<Duration>) -> bool {
        let Some(fetched_at) = self.fetched_at else {
            return true;
        };
        let Some(stale_time) = stale_time else {
            return false;
        };

        let elapsed = Utc::now()
            .signed_duration_since(fetched_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed > stale_time
    }

    /// Check staleness against the entry's own options.
    pub fn is_stale(&self) -> bool {
        self.is_stale_after(self.options.stale_time)
    }

    /// Store a successful fetch result.
    pub fn resolve(&mut self, data: V) {
        self.data = Some(data);
        self.fetched_at = Some(Utc::now());
        self.error = None;
        self.is_fetching = false;
    }

    /// Record a failed fetch, keeping any previous data.
    pub fn fail(&mut self, error: String) {
        self.error = Some(error);
        self.is_fetching = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_entry_is_stale() {
        let entry: CacheEntry<u32> = CacheEntry::new(QueryOptions::never_stale());
        assert!(entry.is_stale());
    }

    #[test]
    fn test_never_stale_once_resolved() {
        let mut entry = CacheEntry::new(QueryOptions::never_stale());
        entry.resolve(7);
        entry.fetched_at = Some(Utc::now() - chrono::Duration::days(1));

        assert!(!entry.is_stale());
    }

    #[test]
    fn test_stale_after_window() {
        let mut entry = CacheEntry::new(QueryOptions::stale_after(Duration::from_millis(2000)));
        entry.resolve("page");
        assert!(!entry.is_stale());

        entry.fetched_at = Some(Utc::now() - chrono::Duration::milliseconds(2500));
        assert!(entry.is_stale());
    }

    #[test]
    fn test_fail_keeps_previous_data() {
        let mut entry = CacheEntry::new(QueryOptions::default());
        entry.resolve(vec![1, 2, 3]);
        entry.is_fetching = true;
        entry.fail("HTTP 500: boom".to_string());

        assert_eq!(entry.data, Some(vec![1, 2, 3]));
        assert_eq!(entry.error.as_deref(), Some("HTTP 500: boom"));
        assert!(!entry.is_fetching);
    }
}
