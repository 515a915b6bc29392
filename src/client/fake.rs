//! In-memory stand-in for the to-do service, used by unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde_json::{Value, json};
use tempfile::TempDir;

use crate::io::cookie_jar::CookieJar;
use crate::model::task::{Task, TaskId};
use crate::ops::controller::Controller;

use super::api::TodoApi;
use super::connector::{Connector, HttpRequest, HttpResponse, Method};
use super::error::ClientError;
use super::session::Session;
use super::transport::Transport;

pub const BASE_URL: &str = "http://fake.test";

#[derive(Default)]
struct FakeState {
    users: HashMap<String, String>,
    /// token -> username
    tokens: HashMap<String, String>,
    /// (owner, task) in creation order
    tasks: Vec<(String, Task)>,
    next_id: u64,
    next_token: u64,
    requests: Vec<HttpRequest>,
    canned: VecDeque<HttpResponse>,
    offline: bool,
}

/// Cloning shares state, so a test keeps a handle while the client owns
/// the boxed connector.
#[derive(Clone, Default)]
pub struct FakeService {
    state: Rc<RefCell<FakeState>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str, password: &str) {
        self.state
            .borrow_mut()
            .users
            .insert(username.to_string(), password.to_string());
    }

    /// Answer the next request with this response instead of routing it
    pub fn respond_next(&self, status: u16, body: &str) {
        self.state
            .borrow_mut()
            .canned
            .push_back(HttpResponse::new(status, body));
    }

    /// While offline every request fails with a transport error
    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state.borrow().requests.last().cloned()
    }

    /// Tasks owned by `username`, as the server holds them
    pub fn tasks_of(&self, username: &str) -> Vec<Task> {
        self.state
            .borrow()
            .tasks
            .iter()
            .filter(|(owner, _)| owner == username)
            .map(|(_, t)| t.clone())
            .collect()
    }

    /// Insert a task directly, as another client would
    pub fn seed_task(&self, owner: &str, title: &str, description: &str, completed: bool) -> TaskId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = TaskId(state.next_id);
        state.tasks.push((
            owner.to_string(),
            Task {
                id,
                title: title.to_string(),
                description: description.to_string(),
                completed,
            },
        ));
        id
    }

    /// Delete a task directly, as another session would
    pub fn remove_task(&self, id: TaskId) {
        self.state.borrow_mut().tasks.retain(|(_, t)| t.id != id);
    }

    fn session(tmp: &TempDir) -> Rc<Session> {
        Rc::new(Session::new(CookieJar::new(tmp.path().join("cookies.json")), 7))
    }

    /// A typed API client wired to this service with a fresh cookie jar
    pub fn api(&self) -> (TodoApi, TempDir) {
        let tmp = TempDir::new().unwrap();
        let transport = Transport::new(BASE_URL, Box::new(self.clone()), Self::session(&tmp));
        (TodoApi::new(transport), tmp)
    }

    /// A controller wired to this service with a fresh cookie jar
    pub fn controller(&self) -> (Controller, TempDir) {
        let tmp = TempDir::new().unwrap();
        let controller = self.controller_in(&tmp);
        (controller, tmp)
    }

    /// A controller sharing the cookie jar in `tmp`
    pub fn controller_in(&self, tmp: &TempDir) -> Controller {
        let session = Self::session(tmp);
        let transport = Transport::new(BASE_URL, Box::new(self.clone()), Rc::clone(&session));
        Controller::new(TodoApi::new(transport), session)
    }
}

impl Connector for FakeService {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());
        if state.offline {
            return Err(ClientError::Transport("connection refused".into()));
        }
        if let Some(canned) = state.canned.pop_front() {
            return Ok(canned);
        }
        Ok(route(&mut state, request))
    }
}

fn route(state: &mut FakeState, request: &HttpRequest) -> HttpResponse {
    let path = request.url.strip_prefix(BASE_URL).unwrap_or(&request.url);
    let body: Value = request
        .body
        .as_deref()
        .and_then(|b| serde_json::from_str(b).ok())
        .unwrap_or(Value::Null);

    match (request.method, path) {
        (Method::Post, "/register") => {
            let (Some(user), Some(pass)) = (str_field(&body, "username"), str_field(&body, "password"))
            else {
                return HttpResponse::new(400, "username and password required");
            };
            if state.users.contains_key(user) {
                return HttpResponse::new(409, "username taken");
            }
            state.users.insert(user.to_string(), pass.to_string());
            let token = issue_token(state, user);
            HttpResponse::new(201, json!({ "token": token }).to_string())
        }
        (Method::Post, "/login") => {
            let user = str_field(&body, "username").unwrap_or_default();
            let pass = str_field(&body, "password").unwrap_or_default();
            if state.users.get(user).map(String::as_str) != Some(pass) {
                return HttpResponse::new(401, "invalid credentials");
            }
            let token = issue_token(state, user);
            HttpResponse::new(200, json!({ "token": token }).to_string())
        }
        _ => {
            let Some(user) = bearer_user(state, request) else {
                return HttpResponse::new(401, "unauthorized");
            };
            authed_route(state, request.method, path, &body, &user)
        }
    }
}

fn authed_route(state: &mut FakeState, method: Method, path: &str, body: &Value, user: &str) -> HttpResponse {
    match (method, path) {
        (Method::Post, "/logout") => {
            state.tokens.retain(|_, owner| owner != user);
            HttpResponse::new(204, "")
        }
        (Method::Get, "/todos") => {
            let tasks: Vec<&Task> = state
                .tasks
                .iter()
                .filter(|(owner, _)| owner == user)
                .map(|(_, t)| t)
                .collect();
            HttpResponse::new(200, serde_json::to_string(&tasks).unwrap())
        }
        (Method::Post, "/todos") => {
            let Some(title) = str_field(body, "title") else {
                return HttpResponse::new(400, "title required");
            };
            state.next_id += 1;
            let task = Task {
                id: TaskId(state.next_id),
                title: title.to_string(),
                description: str_field(body, "description").unwrap_or_default().to_string(),
                completed: false,
            };
            state.tasks.push((user.to_string(), task.clone()));
            HttpResponse::new(201, serde_json::to_string(&task).unwrap())
        }
        (method, p) => {
            let Some(id) = p.strip_prefix("/todos/").and_then(|s| s.parse::<u64>().ok()) else {
                return HttpResponse::new(404, "no such route");
            };
            let Some(pos) = state
                .tasks
                .iter()
                .position(|(owner, t)| owner == user && t.id == TaskId(id))
            else {
                return HttpResponse::new(404, "todo not found");
            };
            match method {
                Method::Put => {
                    let task = &mut state.tasks[pos].1;
                    if let Some(title) = str_field(body, "title") {
                        task.title = title.to_string();
                    }
                    if let Some(desc) = str_field(body, "description") {
                        task.description = desc.to_string();
                    }
                    if let Some(done) = body.get("completed").and_then(Value::as_bool) {
                        task.completed = done;
                    }
                    HttpResponse::new(200, serde_json::to_string(&*task).unwrap())
                }
                Method::Delete => {
                    state.tasks.remove(pos);
                    HttpResponse::new(204, "")
                }
                _ => HttpResponse::new(405, "method not allowed"),
            }
        }
    }
}

fn issue_token(state: &mut FakeState, user: &str) -> String {
    state.next_token += 1;
    let token = format!("tok-{}", state.next_token);
    state.tokens.insert(token.clone(), user.to_string());
    token
}

fn bearer_user(state: &FakeState, request: &HttpRequest) -> Option<String> {
    let token = request.header("authorization")?.strip_prefix("Bearer ")?;
    state.tokens.get(token).cloned()
}

fn str_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}
