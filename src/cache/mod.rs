// Query cache module.
// In-memory, session-scoped cache of API responses with staleness and prefetch.

pub mod entry;
pub mod query;

pub use entry::{CacheEntry, QueryOptions};
pub use query::{QueryCache, QueryState};
