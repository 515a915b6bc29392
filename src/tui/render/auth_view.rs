use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, AuthFocus, AuthMode};
use crate::tui::field::TextField;
use crate::util::unicode::{display_width, truncate_to_width};

const FORM_WIDTH: u16 = 44;
const FORM_HEIGHT: u16 = 7;
const LABEL_WIDTH: usize = 10;

/// Username/password form, centered in `area`
pub fn render_auth_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = FORM_WIDTH.min(area.width);
    let height = FORM_HEIGHT.min(area.height);
    let rect = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let other = app.auth.mode.toggled();
    let title = format!(" {} ", app.auth.mode.label());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(rect);
    let field_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + 1);

    let masked = "*".repeat(app.auth.password.text().chars().count());
    let focus = app.auth.focus;
    let lines = vec![
        field_line(
            app,
            "Username",
            app.auth.username.text(),
            focus == AuthFocus::Username,
            field_width,
        ),
        field_line(app, "Password", &masked, focus == AuthFocus::Password, field_width),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Enter {}  Ctrl-R {}", verb(app.auth.mode), verb(other)),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
        Line::from(Span::styled(
            " Tab next field  Esc quit",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), rect);

    let (row, shown) = match app.auth.focus {
        AuthFocus::Username => (0, app.auth.username.cursor_col()),
        AuthFocus::Password => (1, masked_cursor_col(&app.auth.password)),
    };
    let col = (LABEL_WIDTH + 1 + shown).min(inner.width.saturating_sub(1) as usize);
    if inner.height > row {
        frame.set_cursor_position(Position::new(inner.x + col as u16, inner.y + row));
    }
}

fn verb(mode: AuthMode) -> &'static str {
    match mode {
        AuthMode::Login => "log in",
        AuthMode::Register => "register",
    }
}

fn masked_cursor_col(field: &TextField) -> usize {
    field.text()[..field.cursor()].chars().count()
}

fn field_line<'a>(app: &App, label: &str, value: &str, focused: bool, width: usize) -> Line<'a> {
    let bg = app.theme.background;
    let label_style = if focused {
        Style::default().fg(app.theme.highlight).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let shown = truncate_to_width(value, width);
    let pad = width.saturating_sub(display_width(&shown));
    Line::from(vec![
        Span::styled(format!(" {:<w$}", format!("{}:", label), w = LABEL_WIDTH), label_style),
        Span::styled(
            format!("{}{}", shown, " ".repeat(pad)),
            Style::default().fg(app.theme.text_bright).bg(app.theme.selection_bg),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::client::fake::FakeService;
    use crate::tui::input::test_support::*;
    use crate::tui::render::test_helpers::render_app;

    #[test]
    fn password_is_masked() {
        let service = FakeService::new();
        let (mut app, _tmp) = signed_out(&service);
        type_str(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "hunter2");

        let out = render_app(&mut app);
        assert!(out.contains("Username: alice"));
        assert!(out.contains("Password: *******"));
        assert!(!out.contains("hunter2"));
        assert!(out.contains(" Login "));
    }

    #[test]
    fn register_mode_in_title() {
        let service = FakeService::new();
        let (mut app, _tmp) = signed_out(&service);
        ctrl(&mut app, 'r');
        let out = render_app(&mut app);
        assert!(out.contains(" Register "));
        assert!(out.contains("Ctrl-R log in"));
        assert!(out.contains("signed out"));
    }
}
