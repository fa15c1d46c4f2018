use serde::{Deserialize, Serialize};

use crate::domain::{Task, TaskId};

/// Task mutations pushed to `/api/tasks/events` subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    Created { task: Task },
    Updated { task: Task },
    Deleted { task_id: TaskId },
}

impl TaskEvent {
    pub fn task_id(&self) -> TaskId {
        match self {
            TaskEvent::Created { task } | TaskEvent::Updated { task } => task.id,
            TaskEvent::Deleted { task_id } => *task_id,
        }
    }
}

/// One tick of the `/api/sse-stream` demo stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamUpdate {
    pub count: u32,
    pub message: String,
    pub value: u32,
}

impl StreamUpdate {
    pub fn new(count: u32, value: u32) -> Self {
        Self {
            count,
            message: format!("Update {count}"),
            value,
        }
    }
}

/// Body posted back to `/api/sse-content`; every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamContent {
    pub count: i64,
    pub message: String,
    pub value: i64,
}

impl From<StreamUpdate> for StreamContent {
    fn from(update: StreamUpdate) -> Self {
        Self {
            count: update.count.into(),
            message: update.message,
            value: update.value.into(),
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
