use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned task identifier. Stable for the life of the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(TaskId)
    }
}

/// A single to-do item as returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Body of `POST /todos`. `completed` is left to the server default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
}

/// Body of a completion-only `PUT /todos/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionPatch {
    pub completed: bool,
}

/// Body of a full `PUT /todos/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEdit {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl From<&Task> for TaskEdit {
    fn from(task: &Task) -> Self {
        TaskEdit {
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
        }
    }
}

/// Find a task in a list by id
pub fn find_task(tasks: &[Task], id: TaskId) -> Option<&Task> {
    tasks.iter().find(|t| t.id == id)
}
