//! Free-form note attached to one tag.

use super::tag::TagId;
use super::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NoteId = Uuid;

/// At most one note exists per `(user_id, tag_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNote {
    pub id: NoteId,
    pub user_id: UserId,
    pub tag_id: TagId,
    pub content: String,
}

impl TagNote {
    pub fn new(user_id: UserId, tag_id: TagId, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            tag_id,
            content: content.into(),
        }
    }
}
