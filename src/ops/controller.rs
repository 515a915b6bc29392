use std::rc::Rc;

use tracing::{info, warn};

use crate::client::{ClientError, ReqwestConnector, Session, TodoApi, Transport};
use crate::model::auth::Credentials;
use crate::model::config::ClientConfig;
use crate::model::task::{NewTask, Task, TaskEdit, TaskId, find_task};
use crate::model::view::{EditPanel, ViewState};

/// A change the server accepted, plus the outcome of the reload that
/// followed it. A failed reload leaves the previous snapshot in place but
/// does not undo the change.
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    pub reload: Result<(), ClientError>,
}

impl<T> Applied<T> {
    fn new(value: T, reload: Result<(), ClientError>) -> Self {
        if let Err(e) = &reload {
            warn!(error = %e, "reload after accepted change failed");
        }
        Applied { value, reload }
    }
}

/// Binds user intents to service calls and owns the resulting view state.
///
/// The task list is an immutable snapshot that only a successful fetch
/// replaces. A failed call never touches it.
pub struct Controller {
    api: TodoApi,
    session: Rc<Session>,
    view: ViewState,
    edit: EditPanel,
    tasks: Rc<[Task]>,
}

impl Controller {
    /// View state is derived from whether the session holds a token
    pub fn new(api: TodoApi, session: Rc<Session>) -> Self {
        let view = if session.is_logged_in() {
            ViewState::Authenticated
        } else {
            ViewState::Unauthenticated
        };
        Controller {
            api,
            session,
            view,
            edit: EditPanel::Hidden,
            tasks: Rc::from(Vec::new()),
        }
    }

    /// Build the session, HTTP client and API from config
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let session = Rc::new(Session::from_config(&config.session));
        let connector = ReqwestConnector::new()?;
        let transport = Transport::new(
            config.api.base_url.clone(),
            Box::new(connector),
            Rc::clone(&session),
        );
        Ok(Controller::new(TodoApi::new(transport), session))
    }

    /// Initial load: fetch tasks if a session already exists
    pub fn start(&mut self) -> Result<(), ClientError> {
        match self.view {
            ViewState::Authenticated => self.load_tasks(),
            ViewState::Unauthenticated => Ok(()),
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn edit_panel(&self) -> &EditPanel {
        &self.edit
    }

    /// The current snapshot of the task list
    pub fn tasks(&self) -> Rc<[Task]> {
        Rc::clone(&self.tasks)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        self.api.transport().base_url()
    }

    pub fn register(&mut self, credentials: &Credentials) -> Result<Applied<()>, ClientError> {
        let token = self.api.register(credentials)?;
        info!(username = %credentials.username, "registered");
        self.sign_in(&token)
    }

    pub fn login(&mut self, credentials: &Credentials) -> Result<Applied<()>, ClientError> {
        let token = self.api.login(credentials)?;
        info!(username = %credentials.username, "logged in");
        self.sign_in(&token)
    }

    fn sign_in(&mut self, token: &str) -> Result<Applied<()>, ClientError> {
        self.session.store_issued(token)?;
        self.view = ViewState::Authenticated;
        Ok(Applied::new((), self.load_tasks()))
    }

    /// Best-effort server logout, then local sign-out regardless.
    ///
    /// Local state is always cleared; a failed server call is still returned
    /// so the caller can report it.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        let remote = self.api.logout();
        if let Err(e) = &remote {
            warn!(error = %e, "server logout failed, clearing local session anyway");
        }
        let cleared = self.session.clear_token();
        self.reset_to_unauthenticated();
        info!("logged out");
        cleared?;
        remote
    }

    fn reset_to_unauthenticated(&mut self) {
        self.view = ViewState::Unauthenticated;
        self.edit = EditPanel::Hidden;
        self.tasks = Rc::from(Vec::new());
    }

    /// Re-derive the view from the session after the jar changed outside
    /// this process. Returns true if the view changed.
    pub fn sync_session(&mut self) -> Result<bool, ClientError> {
        match (self.view, self.session.is_logged_in()) {
            (ViewState::Authenticated, false) => {
                info!("session ended elsewhere");
                self.reset_to_unauthenticated();
                Ok(true)
            }
            (ViewState::Unauthenticated, true) => {
                info!("session started elsewhere");
                self.view = ViewState::Authenticated;
                self.load_tasks()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn require_session(&self) -> Result<(), ClientError> {
        match self.view {
            ViewState::Authenticated => Ok(()),
            ViewState::Unauthenticated => Err(ClientError::NotLoggedIn),
        }
    }

    /// Fetch the full list and swap the snapshot
    pub fn load_tasks(&mut self) -> Result<(), ClientError> {
        self.require_session()?;
        let tasks = self.api.list_tasks()?;
        self.tasks = Rc::from(tasks);
        Ok(())
    }

    pub fn create_task(&mut self, task: &NewTask) -> Result<Applied<Task>, ClientError> {
        self.require_session()?;
        let created = self.api.create_task(task)?;
        info!(id = %created.id, "task created");
        Ok(Applied::new(created, self.load_tasks()))
    }

    /// Flip the completed flag as currently shown in the snapshot
    pub fn toggle_task(&mut self, id: TaskId) -> Result<Applied<()>, ClientError> {
        self.require_session()?;
        let current = self.lookup(id)?.completed;
        self.api.set_completed(id, !current)?;
        Ok(Applied::new((), self.load_tasks()))
    }

    /// Open the edit panel on a task from the snapshot
    pub fn begin_edit(&mut self, id: TaskId) -> Result<Task, ClientError> {
        let task = self.lookup(id)?.clone();
        self.edit = EditPanel::Visible(task.clone());
        Ok(task)
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditPanel::Hidden;
    }

    pub fn submit_edit(&mut self, id: TaskId, edit: &TaskEdit) -> Result<Applied<()>, ClientError> {
        self.require_session()?;
        self.api.update_task(id, edit)?;
        self.edit = EditPanel::Hidden;
        Ok(Applied::new((), self.load_tasks()))
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<Applied<()>, ClientError> {
        self.require_session()?;
        self.api.delete_task(id)?;
        if self.edit.task().is_some_and(|t| t.id == id) {
            self.edit = EditPanel::Hidden;
        }
        info!(%id, "task deleted");
        Ok(Applied::new((), self.load_tasks()))
    }

    fn lookup(&self, id: TaskId) -> Result<&Task, ClientError> {
        find_task(&self.tasks, id).ok_or(ClientError::NotFoundLocal(id))
    }
}
