//! Use-case services for lists, tasks, tags and notes.
//!
//! # Responsibility
//! - Validate user input and ownership above the record stores.
//! - Assign append ordinals on creation.
//!
//! # Invariants
//! - Every operation requires a session; the owner is always the session's
//!   user, never a caller-supplied id.
//! - A new ordered record gets `ordinal = current count in its scope`.

pub mod list_service;
pub mod note_service;
pub mod tag_service;
pub mod task_service;

use crate::model::list::ListId;
use crate::model::tag::TagId;
use crate::model::task::TaskId;
use crate::model::UserId;
use crate::repo::StoreError;
use crate::session::Session;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Errors from service use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// No signed-in session.
    AuthRequired,
    /// Task text is blank after trim.
    BlankText,
    /// List or tag name is blank after trim.
    BlankName,
    ListNotFound(ListId),
    TaskNotFound(TaskId),
    TagNotFound(TagId),
    /// Record store failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthRequired => write!(f, "sign-in required"),
            Self::BlankText => write!(f, "task text must not be blank"),
            Self::BlankName => write!(f, "name must not be blank"),
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn require_user(session: Option<&Session>) -> ServiceResult<UserId> {
    session
        .map(|session| session.user_id)
        .ok_or(ServiceError::AuthRequired)
}

/// Trims and collapses inner whitespace runs to one space.
pub fn normalize_name(value: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

fn normalize_task_text(value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::BlankText);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, normalize_task_text, ServiceError};

    #[test]
    fn normalize_name_collapses_whitespace() {
        assert_eq!(
            normalize_name("  Deep \t work\n").as_deref(),
            Some("Deep work")
        );
        assert_eq!(normalize_name(" \n "), None);
    }

    #[test]
    fn task_text_keeps_inner_spacing_but_rejects_blank() {
        assert_eq!(normalize_task_text("  a  b ").unwrap(), "a  b");
        assert!(matches!(
            normalize_task_text("   "),
            Err(ServiceError::BlankText)
        ));
    }
}
