use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, FormFocus, Mode};
use crate::tui::field::TextField;
use crate::util::unicode::{display_width, truncate_to_width};

const LABEL_WIDTH: usize = 13;

/// Rows the panel needs, borders included
pub fn height(app: &App) -> u16 {
    if app.mode == Mode::Edit { 6 } else { 5 }
}

/// Create form or edit panel, below the task list
pub fn render_form_panel(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let editing = app.mode == Mode::Edit;
    let title = match app.controller.edit_panel().task() {
        Some(task) if editing => format!(" Edit #{} ", task.id),
        _ => " New task ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    let field_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + 2);
    let focus = app.form.focus;

    let mut lines = vec![
        field_line(app, "Title", &app.form.title, focus == FormFocus::Title, field_width),
        field_line(
            app,
            "Description",
            &app.form.description,
            focus == FormFocus::Description,
            field_width,
        ),
    ];
    if editing {
        let check = if app.form.completed { "[x]" } else { "[ ]" };
        let style = if focus == FormFocus::Completed {
            Style::default().fg(app.theme.highlight).bg(bg)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<w$}", "Completed:", w = LABEL_WIDTH), style),
            Span::styled(format!("{} (Space)", check), style),
        ]));
    }
    lines.push(Line::from(Span::styled(
        " Tab next field  Enter save  Esc cancel",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);

    let cursor = match focus {
        FormFocus::Title => Some((0, &app.form.title)),
        FormFocus::Description => Some((1, &app.form.description)),
        FormFocus::Completed => None,
    };
    if let Some((row, field)) = cursor
        && inner.height > row
    {
        let col = (LABEL_WIDTH + 1 + field.cursor_col()).min(inner.width.saturating_sub(1) as usize);
        frame.set_cursor_position(Position::new(inner.x + col as u16, inner.y + row));
    }
}

fn field_line<'a>(
    app: &App,
    label: &str,
    field: &TextField,
    focused: bool,
    width: usize,
) -> Line<'a> {
    let bg = app.theme.background;
    let label_style = if focused {
        Style::default().fg(app.theme.highlight).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let shown = truncate_to_width(field.text(), width);
    let pad = width.saturating_sub(display_width(&shown));
    Line::from(vec![
        Span::styled(format!(" {:<w$}", format!("{}:", label), w = LABEL_WIDTH), label_style),
        Span::styled(
            format!("{}{}", shown, " ".repeat(pad)),
            Style::default().fg(app.theme.text_bright).bg(app.theme.selection_bg),
        ),
    ])
}
