// App state and main event loop.
// Routes key presses to the post list, detail, and action state, and applies
// finished fetches between frames.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tracing::debug;

use crate::api::BlogApi;
use crate::state::{MutationKind, MutationState, PostsState, QueryClient, detail};
use crate::ui;

/// How long to wait for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Main application state.
pub struct App<A: BlogApi> {
    /// Query caches and the API they fetch from.
    pub client: QueryClient<A>,
    /// Paginated post list and selection.
    pub posts: PostsState,
    /// Delete and update actions.
    pub mutations: MutationState,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl<A: BlogApi> App<A> {
    pub fn new(api: A) -> Self {
        Self {
            client: QueryClient::new(api),
            posts: PostsState::new(),
            mutations: MutationState::new(),
            show_help: false,
            should_quit: false,
        }
    }

    /// Resolve the first page. Must run inside a tokio runtime.
    pub fn start(&mut self) {
        self.posts.load(&mut self.client);
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.start();
        while !self.should_quit {
            self.tick();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Apply finished fetches and mutations. Returns how many landed.
    pub fn tick(&mut self) -> usize {
        self.client.drain() + self.mutations.drain()
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    /// Apply a single key press.
    pub fn handle_key(&mut self, code: KeyCode) {
        if self.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Left | KeyCode::Char('h') => self.previous_page(),
            KeyCode::Right | KeyCode::Char('l') => self.next_page(),
            KeyCode::Up | KeyCode::Char('k') => self.posts.highlight_prev(),
            KeyCode::Down | KeyCode::Char('j') => {
                let count = self.posts.view(&self.client).data().map_or(0, Vec::len);
                self.posts.highlight_next(count);
            }
            KeyCode::Enter => self.select_highlighted(),
            KeyCode::Char('d') => self.mutate_selected(MutationKind::Delete),
            KeyCode::Char('u') => self.mutate_selected(MutationKind::UpdateTitle),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
    }

    pub fn previous_page(&mut self) {
        if self.posts.go_to_previous_page() {
            self.posts.load(&mut self.client);
        }
    }

    pub fn next_page(&mut self) {
        if self.posts.go_to_next_page() {
            self.posts.load(&mut self.client);
        }
    }

    /// Show the highlighted post in the detail pane.
    pub fn select_highlighted(&mut self) {
        let Some(post) = self.posts.highlighted(&self.client).cloned() else {
            return;
        };
        detail::open(&post, &mut self.client);
        self.posts.select_post(post);
    }

    fn mutate_selected(&mut self, kind: MutationKind) {
        let Some(post_id) = self.posts.selected_post().map(|p| p.id) else {
            debug!(?kind, "no post selected");
            return;
        };
        self.mutations.start(kind, post_id, self.client.api());
    }

    /// Refetch the current page, keeping what is shown until it lands.
    pub fn refresh(&mut self) {
        self.client.refetch_posts(self.posts.current_page());
    }
}
