use crate::io::cookie_jar::JarError;
use crate::model::task::TaskId;

/// Every way a call through the client can fail
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a status outside 200-299
    #[error("{}", api_message(*status, body))]
    Api { status: u16, body: String },
    /// The request never completed (DNS, refused connection, reset, bad URL)
    #[error("could not reach server: {0}")]
    Transport(String),
    /// A task id that is not in the current list
    #[error("task {0} not found in the current list")]
    NotFoundLocal(TaskId),
    /// A 2xx body that was not the expected JSON shape
    #[error("unexpected response from server: {0}")]
    Decode(String),
    #[error("not logged in (run `jot login <username>`)")]
    NotLoggedIn,
    #[error(transparent)]
    Store(#[from] JarError),
}

impl ClientError {
    /// HTTP status for server-side failures
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn api_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP error! status: {}", status)
    } else {
        format!("HTTP error! status: {} ({})", status, body)
    }
}
