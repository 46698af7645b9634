//! Record store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the owner-scoped CRUD/upsert capability the reconciler and the
//!   services depend on.
//! - Keep SQL inside this boundary.
//!
//! # Invariants
//! - Every query and write is filtered by owner; rows of another user are
//!   never returned, overwritten or deleted.
//! - Ordered listings are `ordinal ASC`, ties in insertion order.

use crate::db::DbError;
use crate::model::UserId;
use crate::reorder::Ordered;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod list_repo;
pub mod note_repo;
mod schema;
pub mod tag_repo;
pub mod task_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by record store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No row with this id for the caller.
    NotFound(Uuid),
    /// The id exists under another owner or scope, or the record names a
    /// different owner than the caller.
    NotOwned(Uuid),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::NotOwned(id) => write!(f, "record belongs to another user: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "record store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "record store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "record store requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Owner-scoped persistence for one kind of ordered record.
pub trait RecordStore<T: Ordered> {
    /// Grouping ordinals are unique within, besides the owner.
    type Scope;

    /// Lists the owner's records in `scope`, sorted by ordinal.
    fn list(&self, owner: UserId, scope: &Self::Scope) -> StoreResult<Vec<T>>;
    /// Creates absent ids and updates present ones, all or nothing.
    fn upsert_many(&self, owner: UserId, records: &[T]) -> StoreResult<Vec<T>>;
    /// Rewrites only the ordinals of `ids` in `scope` to their position in
    /// the slice. Ids that no longer exist there are skipped and do not take
    /// a position. Returns the ids written, in order.
    fn write_order(
        &self,
        owner: UserId,
        scope: &Self::Scope,
        ids: &[T::Id],
    ) -> StoreResult<Vec<T::Id>>;
    /// Deletes one record of the owner.
    fn delete_by_id(&self, id: T::Id, owner: UserId) -> StoreResult<()>;
}

impl<T, S> RecordStore<T> for &S
where
    T: Ordered,
    S: RecordStore<T> + ?Sized,
{
    type Scope = S::Scope;

    fn list(&self, owner: UserId, scope: &Self::Scope) -> StoreResult<Vec<T>> {
        (**self).list(owner, scope)
    }

    fn upsert_many(&self, owner: UserId, records: &[T]) -> StoreResult<Vec<T>> {
        (**self).upsert_many(owner, records)
    }

    fn write_order(
        &self,
        owner: UserId,
        scope: &Self::Scope,
        ids: &[T::Id],
    ) -> StoreResult<Vec<T::Id>> {
        (**self).write_order(owner, scope, ids)
    }

    fn delete_by_id(&self, id: T::Id, owner: UserId) -> StoreResult<()> {
        (**self).delete_by_id(id, owner)
    }
}
