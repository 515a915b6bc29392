mod auth;
mod confirm;
mod form;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use auth::handle_auth;
use confirm::handle_confirm;
use form::handle_form;
use navigate::handle_navigate;
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.notice = None;

    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if !app.is_authenticated() {
        handle_auth(app, key);
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Create | Mode::Edit => handle_form(app, key),
        Mode::ConfirmDelete(id) => handle_confirm(app, id, key),
    }
}

/// Handle a bracketed paste into whichever text field has focus
pub fn handle_paste(app: &mut App, text: &str) {
    if text.is_empty() {
        return;
    }
    if !app.is_authenticated() {
        app.auth.focused_mut().insert_str(text);
        return;
    }
    match app.mode {
        Mode::Search => app.search_input.insert_str(text),
        Mode::Create | Mode::Edit => {
            if let Some(field) = app.form.focused_field_mut() {
                field.insert_str(text);
            }
        }
        Mode::Navigate | Mode::ConfirmDelete(_) => {}
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    use crate::client::fake::FakeService;
    use crate::model::{Credentials, UiConfig};
    use crate::tui::app::App;

    pub fn press(app: &mut App, code: KeyCode) {
        super::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    pub fn ctrl(app: &mut App, c: char) {
        super::handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    pub fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    pub fn signed_out(service: &FakeService) -> (App, TempDir) {
        let (controller, tmp) = service.controller();
        (App::new(controller, &UiConfig::default()), tmp)
    }

    /// App logged in as alice, with the tasks already on the server loaded
    pub fn signed_in(service: &FakeService) -> (App, TempDir) {
        service.add_user("alice", "pw");
        let (mut app, tmp) = signed_out(service);
        app.controller
            .login(&Credentials::new("alice", "pw"))
            .unwrap();
        (app, tmp)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::client::fake::FakeService;
    use crate::tui::app::Notice;

    #[test]
    fn any_key_clears_notice() {
        let service = FakeService::new();
        let (mut app, _tmp) = signed_in(&service);
        app.notice = Some(Notice::info("hello"));
        press(&mut app, KeyCode::Char('j'));
        assert!(app.notice.is_none());
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let service = FakeService::new();
        let (mut app, _tmp) = signed_out(&service);
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }

    #[test]
    fn paste_goes_to_focused_field() {
        let service = FakeService::new();
        let (mut app, _tmp) = signed_in(&service);
        press(&mut app, KeyCode::Char('a'));
        handle_paste(&mut app, "oat\nmilk");
        assert_eq!(app.form.title.text(), "oat milk");

        press(&mut app, KeyCode::Esc);
        handle_paste(&mut app, "ignored");
        assert_eq!(app.mode, Mode::Navigate);
    }
}
