// blogem: a terminal client for a paginated blog API.
// Posts and comments are served from an in-memory query cache that
// deduplicates requests, prefetches the next page, and revalidates stale pages.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;
pub mod ui;
