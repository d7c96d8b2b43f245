// Page navigation bar.
// Shows previous/next controls around the current page number.

use ratatui::{prelude::*, widgets::*};

use crate::state::{MAX_POST_PAGE, PostsState};

fn control_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    }
}

/// Draw the pager below the post list.
pub fn draw_pager(frame: &mut Frame, posts: &PostsState, area: Rect) {
    let line = Line::from(vec![
        Span::styled("◀ Previous page", control_style(posts.can_go_back())),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Page {}/{}", posts.current_page(), MAX_POST_PAGE),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::styled("Next page ▶", control_style(posts.can_go_forward())),
    ]);

    let pager = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(pager, area);
}
