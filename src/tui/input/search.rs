use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::search::first_match_from;
use crate::tui::app::{App, Mode};

use super::navigate::jump_with;

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_input.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
            if app.search_input.is_empty() {
                app.last_search = None;
                return;
            }
            app.last_search = Some(app.search_input.text().to_string());
            app.search_input.clear();
            jump_with(app, first_match_from);
        }
        _ => {
            app.search_input.handle_key(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    use super::super::test_support::*;
    use crate::client::fake::FakeService;
    use crate::tui::app::Mode;

    #[test]
    fn enter_runs_search_and_jumps() {
        let service = FakeService::new();
        for title in ["bread", "milk", "eggs"] {
            service.seed_task("alice", title, "", false);
        }
        let (mut app, _tmp) = signed_in(&service);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_str(&mut app, "Milk");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.last_search.as_deref(), Some("Milk"));
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn first_hit_may_be_current_row() {
        let service = FakeService::new();
        service.seed_task("alice", "milk", "", false);
        service.seed_task("alice", "more milk", "", false);
        let (mut app, _tmp) = signed_in(&service);

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "milk");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn no_hit_keeps_cursor() {
        let service = FakeService::new();
        service.seed_task("alice", "milk", "", false);
        service.seed_task("alice", "bread", "", false);
        let (mut app, _tmp) = signed_in(&service);
        app.cursor = 1;

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "eggs");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.cursor, 1);
        assert!(app.notice.is_some());
    }

    #[test]
    fn esc_abandons_query() {
        let service = FakeService::new();
        let (mut app, _tmp) = signed_in(&service);
        app.last_search = Some("old".into());
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "new");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.last_search.as_deref(), Some("old"));
    }
}
