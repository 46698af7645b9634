//! Todo list records.

use super::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ListId = Uuid;

/// Named container that scopes task ordinals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: ListId,
    pub user_id: UserId,
    pub name: String,
}

impl TodoList {
    /// Creates a list with a fresh id.
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
        }
    }
}
