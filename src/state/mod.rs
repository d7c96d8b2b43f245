// State management module.
// Query client, post list and detail state, and post actions.

pub mod client;
pub mod detail;
pub mod mutation;
pub mod posts;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{COMMENTS_QUERY, POSTS_QUERY, POSTS_STALE_TIME, QueryClient};
pub use detail::DetailView;
pub use mutation::{MutationKind, MutationState, MutationStatus};
pub use posts::{MAX_POST_PAGE, PostsState};
