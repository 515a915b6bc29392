use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::find_task;
use crate::tui::app::{App, Mode, NoticeKind};
use crate::util::unicode::{display_width, truncate_to_width};

const NAVIGATE_HINTS: &str = "x toggle  e edit  d delete  a add  / search  r reload  L logout  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    let mut hint = None;

    if let Mode::ConfirmDelete(id) = app.mode
        && app.is_authenticated()
    {
        let tasks = app.controller.tasks();
        let title = find_task(&tasks, id).map(|t| t.title.as_str()).unwrap_or("");
        spans.push(Span::styled(
            format!(
                "Delete #{} \"{}\"? y/n",
                id,
                truncate_to_width(title, width.saturating_sub(20))
            ),
            Style::default().fg(app.theme.red).bg(bg),
        ));
    } else if app.mode == Mode::Search && app.is_authenticated() {
        spans.push(Span::styled(
            format!("/{}", app.search_input.text()),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
        hint = Some("Enter search  Esc cancel");
    } else if let Some(notice) = &app.notice {
        let color = match notice.kind {
            NoticeKind::Error => app.theme.red,
            NoticeKind::Info => app.theme.green,
        };
        spans.push(Span::styled(
            truncate_to_width(&notice.text, width),
            Style::default().fg(color).bg(bg),
        ));
    } else if app.is_authenticated() && app.mode == Mode::Navigate {
        if let Some(pattern) = &app.last_search {
            spans.push(Span::styled(
                format!("/{}", pattern),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
            hint = Some("n/N next/prev");
        } else if app.show_key_hints {
            hint = Some(NAVIGATE_HINTS);
        }
    }

    if let Some(hint) = hint {
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint);
        if content_width + hint_width < width {
            spans.push(Span::styled(
                " ".repeat(width - content_width - hint_width),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
