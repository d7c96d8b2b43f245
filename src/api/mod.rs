// Blog API module.
// Provides the HTTP client and response types for posts and comments.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::ApiClient;
pub use endpoints::{BlogApi, POSTS_PER_PAGE};
pub use types::*;
