use crossterm::event::{KeyCode, KeyEvent};

use crate::model::{NewTask, TaskEdit};
use crate::tui::app::{App, FormFocus, Mode, Notice, TaskForm};

/// Keys for the create form and the edit panel
pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let editing = app.mode == Mode::Edit;
    match key.code {
        KeyCode::Esc => {
            if editing {
                app.controller.cancel_edit();
            }
            app.mode = Mode::Navigate;
        }
        KeyCode::Tab | KeyCode::BackTab => app.form.next_focus(editing),
        KeyCode::Enter if editing => submit_edit(app),
        KeyCode::Enter => submit_create(app),
        KeyCode::Char(' ') if app.form.focus == FormFocus::Completed => {
            app.form.completed = !app.form.completed;
        }
        _ => {
            if let Some(field) = app.form.focused_field_mut() {
                field.handle_key(key);
            }
        }
    }
}

fn submit_create(app: &mut App) {
    let title = app.form.title.text().trim().to_string();
    if title.is_empty() {
        app.notice = Some(Notice::error("Title is required"));
        app.form.focus = FormFocus::Title;
        return;
    }
    let task = NewTask {
        title,
        description: app.form.description.text().trim().to_string(),
    };
    let result = app.controller.create_task(&task);
    if let Some(applied) = app.report("Create", result) {
        app.mode = Mode::Navigate;
        app.form = TaskForm::default();
        let id = applied.value.id;
        if app.report_reload(applied.reload) {
            app.select_task(id);
            app.notice = Some(Notice::info(format!("Added #{}", id)));
        }
    }
    app.after_view_change();
}

fn submit_edit(app: &mut App) {
    let Some(id) = app.controller.edit_panel().task().map(|t| t.id) else {
        app.mode = Mode::Navigate;
        return;
    };
    let title = app.form.title.text().trim().to_string();
    if title.is_empty() {
        app.notice = Some(Notice::error("Title is required"));
        app.form.focus = FormFocus::Title;
        return;
    }
    let edit = TaskEdit {
        title,
        description: app.form.description.text().trim().to_string(),
        completed: app.form.completed,
    };
    let result = app.controller.submit_edit(id, &edit);
    if let Some(applied) = app.report("Save", result) {
        app.mode = Mode::Navigate;
        app.form = TaskForm::default();
        if app.report_reload(applied.reload) {
            app.select_task(id);
        }
    }
    app.after_view_change();
}
