// Post list rendering.
// Draws the current page's titles with loading, error, and empty states.

use ratatui::{prelude::*, widgets::*};

use crate::api::BlogApi;
use crate::cache::QueryState;
use crate::state::{PostsState, QueryClient};

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, block: Block) {
    let text = Paragraph::new("⏳ Loading...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(block);
    frame.render_widget(text, area);
}

/// Render an error heading followed by the error text.
pub fn render_error(frame: &mut Frame, area: Rect, block: Block, error: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "❌ Oops, something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
    ];
    let text = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, block: Block, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(text, area);
}

/// Render the post titles of the current page.
pub fn render_posts_list<A: BlogApi>(
    frame: &mut Frame,
    posts: &mut PostsState,
    client: &QueryClient<A>,
    area: Rect,
) {
    let page = posts.current_page();
    let selected_id = posts.selected_post().map(|p| p.id);

    match posts.view(client) {
        QueryState::Loading => render_loading(frame, area, posts_block(page, false)),
        QueryState::Error(e) => render_error(frame, area, posts_block(page, false), e),
        QueryState::Ready { data, is_fetching } => {
            let block = posts_block(page, is_fetching);
            if data.is_empty() {
                render_empty(frame, area, block, "No posts on this page");
                return;
            }

            let items: Vec<ListItem> = data
                .iter()
                .map(|post| {
                    let marker = if Some(post.id) == selected_id {
                        "● "
                    } else {
                        "  "
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(marker, Style::default().fg(Color::Cyan)),
                        Span::styled(
                            format!("{:>3} ", post.id),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::raw(post.title.clone()),
                    ]))
                })
                .collect();

            let list_widget = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");

            frame.render_stateful_widget(list_widget, area, &mut posts.list_state);
        }
    }
}

fn posts_block(page: u32, is_fetching: bool) -> Block<'static> {
    let title = if is_fetching {
        format!(" Posts · page {} ⟳ ", page)
    } else {
        format!(" Posts · page {} ", page)
    };
    Block::default().borders(Borders::ALL).title(title)
}
