//! Core domain logic for BrainDump.
//! Owns per-user lists, tasks, tags and tag notes, and keeps every ordered
//! collection dense while the user reorders it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reorder;
pub mod repo;
pub mod service;
pub mod session;

pub use config::{open_core, ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LogOptions, LoggingError};
pub use model::list::{ListId, TodoList};
pub use model::note::{NoteId, TagNote};
pub use model::tag::{Tag, TagColor, TagId};
pub use model::task::{PlateTask, Task, TaskId, TaskStatus};
pub use model::UserId;
pub use reorder::{
    DragGesture, DragState, DropIntent, InvalidMove, MoveDirection, MoveResult, Ordered,
    OrderedListReconciler, ReconcileError, ReorderOutcome,
};
pub use repo::list_repo::{ListRepository, SqliteListRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RecordStore, StoreError, StoreResult};
pub use service::list_service::ListService;
pub use service::note_service::NoteService;
pub use service::tag_service::TagService;
pub use service::task_service::TaskService;
pub use service::{ServiceError, ServiceResult};
pub use session::{Session, SessionSlot, SessionSource};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
