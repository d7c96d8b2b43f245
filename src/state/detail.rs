// Post detail state.
// Resolves a post's comments and decides what the detail pane shows.

use crate::api::{BlogApi, Comment, Post};
use crate::cache::QueryState;

use super::client::QueryClient;

/// What the detail pane renders. First match wins: loading, error, ready.
#[derive(Debug, PartialEq, Eq)]
pub enum DetailView<'a> {
    Loading,
    Error(&'a str),
    Ready {
        post: &'a Post,
        comments: &'a [Comment],
    },
}

/// Start resolving the comments for `post`. Comments are fetched once per
/// post id and kept for the session.
pub fn open<A: BlogApi>(post: &Post, client: &mut QueryClient<A>) -> bool {
    client.ensure_comments(post.id)
}

/// Rendering state for `post` from the current cache contents.
pub fn view<'a, A: BlogApi>(post: &'a Post, client: &'a QueryClient<A>) -> DetailView<'a> {
    match client.comments.state(&post.id) {
        None | Some(QueryState::Loading) => DetailView::Loading,
        Some(QueryState::Error(error)) => DetailView::Error(error),
        Some(QueryState::Ready { data, .. }) => DetailView::Ready {
            post,
            comments: data,
        },
    }
}
