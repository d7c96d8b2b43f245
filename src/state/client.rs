// Query client shared by the blog views.
// Holds one query cache per resource kind and the fetchers that fill them.

use std::time::Duration;

use crate::api::{BlogApi, Comment, Post};
use crate::cache::{QueryCache, QueryOptions};

/// Staleness window for post pages.
pub const POSTS_STALE_TIME: Duration = Duration::from_millis(2000);

/// A post page is cached under `("posts", page)`.
pub const POSTS_QUERY: QueryOptions = QueryOptions::stale_after(POSTS_STALE_TIME);

/// Comments are cached under `("comments", post_id)` for the whole session.
pub const COMMENTS_QUERY: QueryOptions = QueryOptions::never_stale();

/// Caches keyed by resource kind, then by the request parameter.
pub struct QueryClient<A: BlogApi> {
    api: A,
    /// Post pages keyed by page number.
    pub posts: QueryCache<u32, Vec<Post>>,
    /// Comment lists keyed by post id.
    pub comments: QueryCache<u64, Vec<Comment>>,
}

impl<A: BlogApi> QueryClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            posts: QueryCache::named("posts"),
            comments: QueryCache::named("comments"),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Resolve a page of posts for display.
    pub fn ensure_posts(&mut self, page: u32) -> bool {
        let api = self.api.clone();
        self.posts
            .ensure(page, POSTS_QUERY, move || async move { api.fetch_posts(page).await })
    }

    /// Populate a page of posts ahead of navigation.
    pub fn prefetch_posts(&mut self, page: u32) -> bool {
        let api = self.api.clone();
        self.posts
            .prefetch(page, POSTS_QUERY, move || async move { api.fetch_posts(page).await })
    }

    /// Refetch a page regardless of its age.
    pub fn refetch_posts(&mut self, page: u32) -> bool {
        let api = self.api.clone();
        self.posts
            .refetch(page, move || async move { api.fetch_posts(page).await })
    }

    /// Resolve the comments of a post for display.
    pub fn ensure_comments(&mut self, post_id: u64) -> bool {
        let api = self.api.clone();
        self.comments.ensure(post_id, COMMENTS_QUERY, move || async move {
            api.fetch_comments(post_id).await
        })
    }

    /// Apply completed fetches from every cache.
    pub fn drain(&mut self) -> usize {
        self.posts.drain() + self.comments.drain()
    }

    /// Wait for every in-flight fetch to land.
    pub async fn settle(&mut self) {
        self.posts.settle().await;
        self.comments.settle().await;
    }

    pub fn in_flight(&self) -> usize {
        self.posts.in_flight() + self.comments.in_flight()
    }
}
