// Post detail pane.
// Renders the selected post, the status of its actions, and its comments.

use ratatui::{prelude::*, widgets::*};

use crate::api::{BlogApi, Comment, Post};
use crate::state::{DetailView, MutationKind, MutationState, MutationStatus, QueryClient, detail};

use super::list::{render_empty, render_error, render_loading};

/// Draw the detail pane for the selected post, if any.
pub fn draw_detail<A: BlogApi>(
    frame: &mut Frame,
    selected: Option<&Post>,
    client: &QueryClient<A>,
    mutations: &MutationState,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(" Post ");

    let Some(post) = selected else {
        render_empty(frame, area, block, "Select a post with Enter");
        return;
    };

    match detail::view(post, client) {
        DetailView::Loading => render_loading(frame, area, block),
        DetailView::Error(e) => render_error(frame, area, block, e),
        DetailView::Ready { post, comments } => {
            let lines = detail_lines(post, comments, mutations);
            let text = Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(text, area);
        }
    }
}

fn detail_lines<'a>(
    post: &'a Post,
    comments: &'a [Comment],
    mutations: &MutationState,
) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(
            post.title.as_str(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("[d]", Style::default().fg(Color::Yellow)),
            Span::raw(" Delete  "),
            Span::styled("[u]", Style::default().fg(Color::Yellow)),
            Span::raw(" Update title"),
        ]),
    ];

    for kind in [MutationKind::Delete, MutationKind::UpdateTitle] {
        if let Some(line) = mutation_line(kind, mutations.status(kind, post.id)) {
            lines.push(line);
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(post.body.as_str()));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Comments",
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )));

    if comments.is_empty() {
        lines.push(Line::from(Span::styled(
            "No comments",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for comment in comments {
        lines.push(Line::from(vec![
            Span::styled("• ", Style::default().fg(Color::DarkGray)),
            Span::styled(comment.email.as_str(), Style::default().fg(Color::Cyan)),
            Span::raw(": "),
            Span::raw(comment.body.as_str()),
        ]));
    }

    lines
}

fn mutation_line(kind: MutationKind, status: &MutationStatus) -> Option<Line<'static>> {
    let (text, color) = match status {
        MutationStatus::Idle => return None,
        MutationStatus::Pending => (kind.pending_message().to_string(), Color::Magenta),
        MutationStatus::Error(e) => (format!("{}: {}", kind.error_message(), e), Color::Red),
        MutationStatus::Success => (kind.success_message().to_string(), Color::Green),
    };
    Some(Line::from(Span::styled(text, Style::default().fg(color))))
}
