use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::display_width;

/// App name and server on the left, session state on the right, then a rule
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = vec![
        Span::styled(
            " jot ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", app.controller.base_url()),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];

    let (state, color) = if app.is_authenticated() {
        let count = app.controller.tasks().len();
        let noun = if count == 1 { "task" } else { "tasks" };
        (format!("{} {}  signed in ", count, noun), app.theme.green)
    } else {
        ("signed out ".to_string(), app.theme.yellow)
    };
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let state_width = display_width(&state);
    if used + state_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - state_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(state, Style::default().fg(color).bg(bg)));
    }

    let rule = Span::styled(
        "\u{2500}".repeat(width),
        Style::default().fg(app.theme.dim).bg(bg),
    );
    let paragraph = Paragraph::new(vec![Line::from(spans), Line::from(rule)])
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
