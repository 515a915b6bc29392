use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;
use tracing::{debug, warn};

use crate::client::ClientError;
use crate::io::watcher::{self, JarWatcher};
use crate::model::{ClientConfig, Task, TaskId, UiConfig, ViewState};
use crate::ops::controller::Controller;
use crate::ops::search;

use super::field::TextField;
use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode while authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
    /// Create form open
    Create,
    /// Edit panel open
    Edit,
    /// Waiting for y/n on deleting this task
    ConfirmDelete(TaskId),
}

/// Whether the auth form logs in or registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthFocus {
    #[default]
    Username,
    Password,
}

/// Username/password form shown while unauthenticated
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub focus: AuthFocus,
    pub username: TextField,
    pub password: TextField,
}

impl AuthForm {
    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            AuthFocus::Username => &mut self.username,
            AuthFocus::Password => &mut self.password,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormFocus {
    #[default]
    Title,
    Description,
    Completed,
}

/// Field values shared by the create form and the edit panel. The create
/// form has no completed field.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub focus: FormFocus,
    pub title: TextField,
    pub description: TextField,
    pub completed: bool,
}

impl TaskForm {
    /// Form pre-filled from a task, for the edit panel
    pub fn from_task(task: &Task) -> Self {
        TaskForm {
            focus: FormFocus::Title,
            title: TextField::with_text(task.title.clone()),
            description: TextField::with_text(task.description.clone()),
            completed: task.completed,
        }
    }

    /// Cycle focus; the completed field only exists when editing
    pub fn next_focus(&mut self, editing: bool) {
        self.focus = match (self.focus, editing) {
            (FormFocus::Title, _) => FormFocus::Description,
            (FormFocus::Description, true) => FormFocus::Completed,
            (FormFocus::Description, false) | (FormFocus::Completed, _) => FormFocus::Title,
        };
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            FormFocus::Title => Some(&mut self.title),
            FormFocus::Description => Some(&mut self.description),
            FormFocus::Completed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One-line message in the status row, cleared on the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Main application state
pub struct App {
    pub controller: Controller,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    pub auth: AuthForm,
    pub form: TaskForm,
    /// Cursor index into the task list
    pub cursor: usize,
    /// First visible row of the task list
    pub scroll_offset: usize,
    /// Search mode: query being typed
    pub search_input: TextField,
    /// Last executed search pattern
    pub last_search: Option<String>,
    pub notice: Option<Notice>,
    pub show_key_hints: bool,
}

impl App {
    pub fn new(controller: Controller, ui: &UiConfig) -> Self {
        App {
            controller,
            theme: Theme::from_config(ui),
            mode: Mode::Navigate,
            should_quit: false,
            auth: AuthForm::default(),
            form: TaskForm::default(),
            cursor: 0,
            scroll_offset: 0,
            search_input: TextField::default(),
            last_search: None,
            notice: None,
            show_key_hints: ui.show_key_hints,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.controller.view() == ViewState::Authenticated
    }

    /// Turn a failed call into an error notice. Returns the value on success.
    pub fn report<T>(&mut self, action: &str, result: Result<T, ClientError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(action, error = %e, "action failed");
                self.notice = Some(Notice::error(format!("{} failed: {}", action, e)));
                None
            }
        }
    }

    /// Report a reload that failed after the server accepted a change.
    /// Returns true when the reload went through.
    pub fn report_reload(&mut self, reload: Result<(), ClientError>) -> bool {
        match reload {
            Ok(()) => true,
            Err(e) => {
                self.notice = Some(Notice::error(format!("Reload failed: {}", e)));
                false
            }
        }
    }

    /// Task under the cursor
    pub fn selected_task(&self) -> Option<Task> {
        self.controller.tasks().get(self.cursor).cloned()
    }

    /// Keep the cursor inside the list after it was replaced
    pub fn clamp_cursor(&mut self) {
        let len = self.controller.tasks().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Move the cursor onto the task with this id, if it is listed
    pub fn select_task(&mut self, id: TaskId) {
        if let Some(pos) = self.controller.tasks().iter().position(|t| t.id == id) {
            self.cursor = pos;
        }
    }

    /// Compiled pattern of the last executed search
    pub fn active_search_re(&self) -> Option<Regex> {
        self.last_search.as_deref().and_then(search::compile_pattern)
    }

    /// Bring local UI state in line with the controller after an action or
    /// an external session change.
    pub fn after_view_change(&mut self) {
        if !self.is_authenticated() {
            self.mode = Mode::Navigate;
            self.form = TaskForm::default();
            self.search_input.clear();
            self.last_search = None;
            self.cursor = 0;
            self.scroll_offset = 0;
        } else if self.mode == Mode::Edit && !self.controller.edit_panel().is_visible() {
            self.mode = Mode::Navigate;
        }
        self.clamp_cursor();
    }

    /// React to the cookie jar changing on disk
    pub fn on_jar_changed(&mut self) {
        let result = self.controller.sync_session();
        if let Some(true) = self.report("Session refresh", result) {
            self.notice = Some(if self.is_authenticated() {
                Notice::info("Signed in from another session")
            } else {
                Notice::info("Signed out from another session")
            });
        }
        self.after_view_change();
    }
}

/// Run the TUI application
pub fn run(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let controller = Controller::from_config(config)?;
    let mut app = App::new(controller, &config.ui);
    let start = app.controller.start();
    app.report("Load", start);

    let jar_path = app.controller.session().jar_path().to_path_buf();
    std::fs::create_dir_all(watcher::watch_dir(&jar_path))?;
    let jar_watcher = match JarWatcher::start(&jar_path) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "cannot watch cookie jar, external logins will not be noticed");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, jar_watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    jar_watcher: Option<&JarWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if jar_watcher.is_some_and(JarWatcher::poll) {
            debug!("cookie jar changed on disk");
            app.on_jar_changed();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
