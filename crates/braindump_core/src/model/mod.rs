//! Domain records for lists, tasks, tags and per-tag notes.
//!
//! # Responsibility
//! - Define the plain data shapes persisted by the record store.
//! - Keep owner and scope fields explicit on every record.
//!
//! # Invariants
//! - Ids are assigned once at creation and never reused.
//! - `user_id` and scope fields (`list_id`, `tag_id` of a note) never change
//!   after creation.

pub mod list;
pub mod note;
pub mod tag;
pub mod task;

use uuid::Uuid;

/// Owner identity taken from the active session.
pub type UserId = Uuid;
