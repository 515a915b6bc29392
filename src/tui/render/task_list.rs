use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regex::Regex;

use crate::model::Task;
use crate::tui::app::App;
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_to_width};

use super::{pad_to_width, push_highlighted_spans};

const DESCRIPTION_INDENT: &str = "         ";

/// Label of the completion control for a task in this state
pub fn toggle_label(completed: bool) -> &'static str {
    if completed { "Undo" } else { "Complete" }
}

fn controls(task: &Task) -> String {
    format!("[{}] [Edit] [Delete] ", toggle_label(task.completed))
}

/// Rows a task occupies: title row plus a description row when present
pub fn row_height(task: &Task) -> usize {
    if task.description.trim().is_empty() { 1 } else { 2 }
}

/// Lines for every task, each tagged with its list position. A pure
/// function of the list; nothing here depends on what was drawn before.
pub fn task_lines<'a>(
    tasks: &[Task],
    theme: &Theme,
    cursor: Option<usize>,
    width: usize,
    search_re: Option<&Regex>,
) -> Vec<(usize, Line<'a>)> {
    let mut lines = Vec::new();
    for (i, task) in tasks.iter().enumerate() {
        let is_cursor = cursor == Some(i);
        let bg = if is_cursor {
            theme.selection_bg
        } else {
            theme.background
        };
        let bg_style = Style::default().bg(bg);

        let check = if task.completed { "[x]" } else { "[ ]" };
        let id = format!("#{}", task.id);
        let prefix = format!(" {} {:<5} ", check, id);
        let controls = controls(task);
        let title_room = width.saturating_sub(display_width(&prefix) + display_width(&controls) + 1);
        let title = truncate_to_width(&task.title, title_room);

        let mut title_style = Style::default().fg(theme.text_bright).bg(bg);
        if task.completed {
            title_style = title_style.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT);
        }
        if is_cursor {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }
        let match_style = Style::default()
            .fg(theme.search_match_fg)
            .bg(theme.search_match_bg);

        let mut spans = vec![
            Span::styled(" ", bg_style),
            Span::styled(check, Style::default().fg(theme.check_color(task.completed)).bg(bg)),
            Span::styled(
                format!(" {:<5} ", id),
                Style::default().fg(theme.dim).bg(bg),
            ),
        ];
        push_highlighted_spans(&mut spans, &title, title_style, match_style, search_re);
        pad_to_width(&mut spans, width.saturating_sub(display_width(&controls)), bg_style);
        let control_color = if is_cursor { theme.highlight } else { theme.dim };
        spans.push(Span::styled(controls, Style::default().fg(control_color).bg(bg)));
        lines.push((i, Line::from(spans)));

        let description = task.description.trim();
        if !description.is_empty() {
            let room = width.saturating_sub(DESCRIPTION_INDENT.len() + 1);
            let mut spans = vec![Span::styled(DESCRIPTION_INDENT, bg_style)];
            push_highlighted_spans(
                &mut spans,
                &truncate_to_width(description, room),
                Style::default().fg(theme.text).bg(bg),
                match_style,
                search_re,
            );
            pad_to_width(&mut spans, width, bg_style);
            lines.push((i, Line::from(spans)));
        }
    }
    lines
}

/// First visible task index that keeps the cursor row on screen
pub fn adjust_scroll(tasks: &[Task], cursor: usize, scroll: usize, visible: usize) -> usize {
    if tasks.is_empty() {
        return 0;
    }
    let cursor = cursor.min(tasks.len() - 1);
    let mut scroll = scroll.min(cursor);
    while scroll < cursor
        && tasks[scroll..=cursor].iter().map(row_height).sum::<usize>() > visible
    {
        scroll += 1;
    }
    scroll
}

/// Render the task list
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let tasks = app.controller.tasks();
    if tasks.is_empty() {
        let empty = Paragraph::new(" No tasks yet. Press a to add one.")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let visible = area.height as usize;
    app.scroll_offset = adjust_scroll(&tasks, app.cursor, app.scroll_offset, visible);
    let search_re = app.active_search_re();

    let lines: Vec<Line> = task_lines(
        &tasks,
        &app.theme,
        Some(app.cursor),
        area.width as usize,
        search_re.as_ref(),
    )
    .into_iter()
    .filter(|(i, _)| *i >= app.scroll_offset)
    .take(visible)
    .map(|(_, line)| line)
    .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
