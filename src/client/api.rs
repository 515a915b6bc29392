use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::auth::{Credentials, TokenResponse};
use crate::model::task::{CompletionPatch, NewTask, Task, TaskEdit, TaskId};

use super::connector::Method;
use super::error::ClientError;
use super::transport::Transport;

/// Typed endpoints of the to-do service
pub struct TodoApi {
    transport: Transport,
}

impl TodoApi {
    pub fn new(transport: Transport) -> Self {
        TodoApi { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// `POST /register`, returning the issued token
    pub fn register(&self, credentials: &Credentials) -> Result<String, ClientError> {
        self.authenticate("/register", credentials)
    }

    /// `POST /login`, returning the issued token
    pub fn login(&self, credentials: &Credentials) -> Result<String, ClientError> {
        self.authenticate("/login", credentials)
    }

    fn authenticate(&self, endpoint: &str, credentials: &Credentials) -> Result<String, ClientError> {
        let body = encode(credentials)?;
        let reply = self.transport.request(endpoint, Method::Post, Some(&body))?;
        let TokenResponse { token } = decode(reply)?;
        Ok(token)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.transport.request("/logout", Method::Post, None)?;
        Ok(())
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        decode(self.transport.request("/todos", Method::Get, None)?)
    }

    pub fn create_task(&self, task: &NewTask) -> Result<Task, ClientError> {
        let body = encode(task)?;
        decode(self.transport.request("/todos", Method::Post, Some(&body))?)
    }

    /// `PUT /todos/{id}` with only the completed flag
    pub fn set_completed(&self, id: TaskId, completed: bool) -> Result<(), ClientError> {
        let body = encode(&CompletionPatch { completed })?;
        self.transport.request(&task_path(id), Method::Put, Some(&body))?;
        Ok(())
    }

    /// `PUT /todos/{id}` with every editable field
    pub fn update_task(&self, id: TaskId, edit: &TaskEdit) -> Result<(), ClientError> {
        let body = encode(edit)?;
        self.transport.request(&task_path(id), Method::Put, Some(&body))?;
        Ok(())
    }

    pub fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        self.transport.request(&task_path(id), Method::Delete, None)?;
        Ok(())
    }
}

pub fn task_path(id: TaskId) -> String {
    format!("/todos/{}", id)
}

fn encode<T: Serialize>(body: &T) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(reply: Option<Value>) -> Result<T, ClientError> {
    let value = reply.ok_or_else(|| ClientError::Decode("empty response body".into()))?;
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}
