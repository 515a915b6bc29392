use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::search::{matching_indices, next_match};
use crate::tui::app::{App, Mode, Notice, TaskForm};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    let len = app.controller.tasks().len();
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => {
            if app.cursor + 1 < len {
                app.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.cursor = len.saturating_sub(1),
        KeyCode::Char(' ') | KeyCode::Char('x') => toggle_selected(app),
        KeyCode::Char('e') | KeyCode::Enter => edit_selected(app),
        KeyCode::Char('d') => {
            if let Some(task) = app.selected_task() {
                app.mode = Mode::ConfirmDelete(task.id);
            }
        }
        KeyCode::Char('a') => {
            app.form = TaskForm::default();
            app.mode = Mode::Create;
        }
        KeyCode::Char('r') => {
            let result = app.controller.load_tasks();
            if app.report("Reload", result).is_some() {
                let count = app.controller.tasks().len();
                app.notice = Some(Notice::info(format!("{} tasks", count)));
            }
            app.clamp_cursor();
        }
        KeyCode::Char('/') => {
            app.search_input.clear();
            app.mode = Mode::Search;
        }
        KeyCode::Char('n') => jump_to_match(app, true),
        KeyCode::Char('N') => jump_to_match(app, false),
        KeyCode::Esc => app.last_search = None,
        KeyCode::Char('L') => {
            let result = app.controller.logout();
            if app.report("Logout", result).is_some() {
                app.notice = Some(Notice::info("Logged out"));
            }
            app.after_view_change();
        }
        KeyCode::Char('?') => app.show_key_hints = !app.show_key_hints,
        _ => {}
    }
}

fn toggle_selected(app: &mut App) {
    let Some(task) = app.selected_task() else {
        return;
    };
    let result = app.controller.toggle_task(task.id);
    if let Some(applied) = app.report("Toggle", result) {
        app.report_reload(applied.reload);
    }
    app.select_task(task.id);
    app.after_view_change();
}

fn edit_selected(app: &mut App) {
    let Some(task) = app.selected_task() else {
        return;
    };
    let result = app.controller.begin_edit(task.id);
    if let Some(task) = app.report("Edit", result) {
        app.form = TaskForm::from_task(&task);
        app.mode = Mode::Edit;
    }
}

/// Move the cursor to the next (or previous) task matching the last search
pub(super) fn jump_to_match(app: &mut App, forward: bool) {
    jump_with(app, |indices, cursor| next_match(indices, cursor, forward));
}

/// Move the cursor to the match `pick` chooses among the current hits
pub(super) fn jump_with(app: &mut App, pick: impl Fn(&[usize], usize) -> Option<usize>) {
    let Some(re) = app.active_search_re() else {
        return;
    };
    let indices = matching_indices(&app.controller.tasks(), &re);
    match pick(&indices, app.cursor) {
        Some(i) => app.cursor = i,
        None => {
            let pattern = app.last_search.clone().unwrap_or_default();
            app.notice = Some(Notice::info(format!("No matches for /{}", pattern)));
        }
    }
}
