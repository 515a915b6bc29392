use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Credentials;
use crate::tui::app::{App, AuthFocus, AuthForm, AuthMode, Notice};

pub(super) fn handle_auth(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.should_quit = true,
        (_, KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down) => {
            app.auth.focus = match app.auth.focus {
                AuthFocus::Username => AuthFocus::Password,
                AuthFocus::Password => AuthFocus::Username,
            };
        }
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
            app.auth.mode = app.auth.mode.toggled();
        }
        (_, KeyCode::Enter) => submit(app),
        _ => {
            app.auth.focused_mut().handle_key(key);
        }
    }
}

fn submit(app: &mut App) {
    let username = app.auth.username.text().trim().to_string();
    let password = app.auth.password.text().to_string();
    if username.is_empty() || password.is_empty() {
        app.notice = Some(Notice::error("Username and password are required"));
        app.auth.focus = if username.is_empty() {
            AuthFocus::Username
        } else {
            AuthFocus::Password
        };
        return;
    }

    let credentials = Credentials::new(username.clone(), password);
    let mode = app.auth.mode;
    let result = match mode {
        AuthMode::Login => app.controller.login(&credentials),
        AuthMode::Register => app.controller.register(&credentials),
    };

    let signed_in = app.is_authenticated();
    if let Some(applied) = app.report(mode.label(), result)
        && app.report_reload(applied.reload)
    {
        app.notice = Some(Notice::info(format!("Signed in as {}", username)));
    }
    if signed_in {
        app.auth = AuthForm::default();
    } else {
        app.auth.password.clear();
        app.auth.focus = AuthFocus::Password;
    }
    app.after_view_change();
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    use super::super::test_support::*;
    use crate::client::fake::FakeService;
    use crate::tui::app::{AuthFocus, AuthMode, NoticeKind};

    fn fill(app: &mut crate::tui::app::App, user: &str, pass: &str) {
        type_str(app, user);
        press(app, KeyCode::Tab);
        type_str(app, pass);
    }

    #[test]
    fn login_through_form() {
        let service = FakeService::new();
        service.add_user("alice", "pw");
        service.seed_task("alice", "milk", "", false);
        let (mut app, _tmp) = signed_out(&service);

        fill(&mut app, "alice", "pw");
        press(&mut app, KeyCode::Enter);

        assert!(app.is_authenticated());
        assert_eq!(app.controller.tasks().len(), 1);
        assert!(app.auth.username.is_empty());
        assert_eq!(app.notice.unwrap().text, "Signed in as alice");
    }

    #[test]
    fn login_accepted_but_reload_failed_still_signs_in() {
        let service = FakeService::new();
        let (mut app, _tmp) = signed_out(&service);
        service.respond_next(200, r#"{"token":"abc"}"#);
        service.respond_next(500, "boom");

        fill(&mut app, "alice", "pw");
        press(&mut app, KeyCode::Enter);

        assert!(app.is_authenticated());
        assert!(app.auth.username.is_empty());
        let notice = app.notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Reload failed: HTTP error! status: 500 (boom)");
        assert_eq!(service.request_count(), 2);
    }

    #[test]
    fn ctrl_r_switches_to_register() {
        let service = FakeService::new();
        let (mut app, _tmp) = signed_out(&service);
        ctrl(&mut app, 'r');
        assert_eq!(app.auth.mode, AuthMode::Register);

        fill(&mut app, "bob", "secret");
        press(&mut app, KeyCode::Enter);
        assert!(app.is_authenticated());
        assert!(service.requests()[0].url.ends_with("/register"));
    }

    #[test]
    fn rejected_login_keeps_username_and_clears_password() {
        let service = FakeService::new();
        service.add_user("alice", "pw");
        let (mut app, _tmp) = signed_out(&service);

        fill(&mut app, "alice", "wrong");
        press(&mut app, KeyCode::Enter);

        assert!(!app.is_authenticated());
        assert_eq!(app.auth.username.text(), "alice");
        assert!(app.auth.password.is_empty());
        assert_eq!(app.auth.focus, AuthFocus::Password);
        let notice = app.notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.starts_with("Login failed: HTTP error! status: 401"));
    }

    #[test]
    fn empty_fields_never_reach_the_server() {
        let service = FakeService::new();
        let (mut app, _tmp) = signed_out(&service);
        type_str(&mut app, "alice");
        press(&mut app, KeyCode::Enter);
        assert_eq!(service.request_count(), 0);
        assert_eq!(app.auth.focus, AuthFocus::Password);
        assert!(app.notice.is_some());
    }

    #[test]
    fn esc_quits() {
        let service = FakeService::new();
        let (mut app, _tmp) = signed_out(&service);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
