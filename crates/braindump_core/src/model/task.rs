//! Task records.
//!
//! # Invariants
//! - `ordinal` is unique within `(user_id, list_id)` at rest, except
//!   transiently after a delete or an append that follows a delete.

use super::list::ListId;
use super::tag::TagId;
use super::UserId;
use crate::reorder::Ordered;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TaskId = Uuid;

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    /// Parses the storage representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "doing" => Some(Self::Doing),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// One entry of a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub list_id: ListId,
    pub text: String,
    pub status: TaskStatus,
    /// Optional tag; cleared when the tag is deleted.
    pub tag_id: Option<TagId>,
    /// Display position within the list.
    pub ordinal: i64,
}

impl Task {
    /// Creates a `todo` task with a fresh id at the given ordinal.
    pub fn new(user_id: UserId, list_id: ListId, text: impl Into<String>, ordinal: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            list_id,
            text: text.into(),
            status: TaskStatus::Todo,
            tag_id: None,
            ordinal,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// A `doing` task shown on the user's plate, with the name of its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateTask {
    #[serde(flatten)]
    pub task: Task,
    pub list_name: String,
}

impl Ordered for Task {
    type Id = TaskId;

    fn id(&self) -> TaskId {
        self.id
    }

    fn ordinal(&self) -> i64 {
        self.ordinal
    }

    fn set_ordinal(&mut self, ordinal: i64) {
        self.ordinal = ordinal;
    }
}
