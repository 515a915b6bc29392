use crossterm::event::{KeyCode, KeyEvent};

use crate::model::TaskId;
use crate::tui::app::{App, Mode, Notice};

pub(super) fn handle_confirm(app: &mut App, id: TaskId, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.mode = Mode::Navigate;
            let result = app.controller.delete_task(id);
            if let Some(applied) = app.report("Delete", result)
                && app.report_reload(applied.reload)
            {
                app.notice = Some(Notice::info(format!("Deleted #{}", id)));
            }
            app.after_view_change();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    use super::super::test_support::*;
    use crate::client::fake::FakeService;
    use crate::tui::app::{Mode, NoticeKind};

    #[test]
    fn y_deletes_and_clamps_cursor() {
        let service = FakeService::new();
        service.seed_task("alice", "a", "", false);
        service.seed_task("alice", "b", "", false);
        let (mut app, _tmp) = signed_in(&service);

        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(service.tasks_of("alice").len(), 1);
        assert_eq!(app.controller.tasks().len(), 1);
        assert_eq!(app.cursor, 0);
        assert_eq!(app.notice.unwrap().text, "Deleted #2");
    }

    #[test]
    fn n_keeps_task() {
        let service = FakeService::new();
        service.seed_task("alice", "a", "", false);
        let (mut app, _tmp) = signed_in(&service);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(service.tasks_of("alice").len(), 1);
    }

    #[test]
    fn delete_accepted_but_reload_failed_reports_reload() {
        let service = FakeService::new();
        service.seed_task("alice", "a", "", false);
        let (mut app, _tmp) = signed_in(&service);

        press(&mut app, KeyCode::Char('d'));
        service.respond_next(204, "");
        service.respond_next(500, "boom");
        press(&mut app, KeyCode::Char('y'));

        let notice = app.notice.clone().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Reload failed: HTTP error! status: 500 (boom)");
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn deleting_a_task_gone_from_server_reports_error() {
        let service = FakeService::new();
        let id = service.seed_task("alice", "a", "", false);
        let (mut app, _tmp) = signed_in(&service);
        service.remove_task(id);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        let notice = app.notice.clone().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("404"));
        // The stale row stays until the next successful load
        assert_eq!(app.controller.tasks().len(), 1);
    }
}
