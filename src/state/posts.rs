// Post list state.
// Owns the current page and selected post, and drives page fetch and next-page prefetch.

use ratatui::widgets::ListState;
use tracing::info;

use crate::api::{BlogApi, Post};
use crate::cache::QueryState;

use super::client::QueryClient;

/// Last page of posts the list can navigate to.
pub const MAX_POST_PAGE: u32 = 10;

/// State for the paginated post list.
#[derive(Debug)]
pub struct PostsState {
    current_page: u32,
    selected_post: Option<Post>,
    /// Highlighted row on the current page.
    pub list_state: ListState,
}

impl Default for PostsState {
    fn default() -> Self {
        Self {
            current_page: 1,
            selected_post: None,
            list_state: ListState::default().with_selected(Some(0)),
        }
    }
}

impl PostsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.selected_post.as_ref()
    }

    /// Whether "Previous page" is enabled.
    pub fn can_go_back(&self) -> bool {
        self.current_page > 1
    }

    /// Whether "Next page" is enabled.
    pub fn can_go_forward(&self) -> bool {
        self.current_page < MAX_POST_PAGE
    }

    /// Step back one page. Returns false at the first page.
    pub fn go_to_previous_page(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.current_page -= 1;
        self.list_state.select(Some(0));
        info!(page = self.current_page, "previous page");
        true
    }

    /// Step forward one page. Returns false at the last page.
    pub fn go_to_next_page(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.current_page += 1;
        self.list_state.select(Some(0));
        info!(page = self.current_page, "next page");
        true
    }

    /// Resolve the current page and prefetch the one after it.
    /// Must run on start and after every page change.
    pub fn load<A: BlogApi>(&self, client: &mut QueryClient<A>) {
        client.ensure_posts(self.current_page);
        if self.current_page < MAX_POST_PAGE {
            client.prefetch_posts(self.current_page + 1);
        }
    }

    /// What the list should render for the current page.
    pub fn view<'a, A: BlogApi>(&self, client: &'a QueryClient<A>) -> QueryState<'a, Vec<Post>> {
        client
            .posts
            .state(&self.current_page)
            .unwrap_or(QueryState::Loading)
    }

    /// The highlighted post, if the current page is loaded.
    pub fn highlighted<'a, A: BlogApi>(&self, client: &'a QueryClient<A>) -> Option<&'a Post> {
        let posts = self.view(client).data()?;
        posts.get(self.list_state.selected()?)
    }

    /// Move the highlight down, stopping at the last post.
    pub fn highlight_next(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < count => i + 1,
            Some(i) => i.min(count - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Move the highlight up, stopping at the first post.
    pub fn highlight_prev(&mut self) {
        let i = self
            .list_state
            .selected()
            .map(|i| i.saturating_sub(1))
            .unwrap_or(0);
        self.list_state.select(Some(i));
    }

    /// Make `post` the one shown in the detail pane.
    pub fn select_post(&mut self, post: Post) {
        info!(post_id = post.id, "selected post");
        self.selected_post = Some(post);
    }
}
