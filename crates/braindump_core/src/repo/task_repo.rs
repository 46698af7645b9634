//! Task store over the `tasks` table.
//!
//! # Invariants
//! - The ordinal scope is `(user_id, list_id)`.
//! - Upserts never move a task to another owner or list, and never create
//!   a task in a list or with a tag the owner does not have.
//! - Reordering writes ordinals only; content columns stay untouched.

use super::schema::{ensure_table_ready, owned_row_exists, parse_uuid};
use super::{RecordStore, StoreError, StoreResult};
use crate::model::list::ListId;
use crate::model::tag::TagId;
use crate::model::task::{PlateTask, Task, TaskId, TaskStatus};
use crate::model::UserId;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    list_id,
    text,
    status,
    tag_id,
    ordinal
FROM tasks";

/// Task persistence beyond the generic record store contract.
pub trait TaskRepository: RecordStore<Task, Scope = ListId> {
    /// Inserts a new task as given, ordinal included.
    fn insert_task(&self, task: &Task) -> StoreResult<Task>;
    fn get_task(&self, owner: UserId, id: TaskId) -> StoreResult<Option<Task>>;
    /// Number of tasks in one list; the ordinal of the next appended task.
    fn count_tasks(&self, owner: UserId, list_id: ListId) -> StoreResult<i64>;
    /// Writes text, status and tag. Ordinal and scope are left alone.
    fn update_task_content(&self, task: &Task) -> StoreResult<Task>;
    /// Tasks carrying `tag_id` across all lists, by list then ordinal.
    fn list_tasks_by_tag(&self, owner: UserId, tag_id: TagId) -> StoreResult<Vec<Task>>;
    /// Tasks in `status` across all lists, each with its list name.
    fn list_tasks_by_status(
        &self,
        owner: UserId,
        status: TaskStatus,
    ) -> StoreResult<Vec<PlateTask>>;
    /// Whether the list exists and belongs to `owner`.
    fn owns_list(&self, owner: UserId, list_id: ListId) -> StoreResult<bool>;
    /// Whether the tag exists and belongs to `owner`.
    fn owns_tag(&self, owner: UserId, tag_id: TagId) -> StoreResult<bool>;
}

/// SQLite-backed task store.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates the store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_table_ready(
            conn,
            "tasks",
            &["id", "user_id", "list_id", "text", "status", "tag_id", "ordinal"],
        )?;
        Ok(Self { conn })
    }
}

impl RecordStore<Task> for SqliteTaskRepository<'_> {
    type Scope = ListId;

    fn list(&self, owner: UserId, list_id: &ListId) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE user_id = ?1
               AND list_id = ?2
             ORDER BY ordinal ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query(params![owner.to_string(), list_id.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn upsert_many(&self, owner: UserId, records: &[Task]) -> StoreResult<Vec<Task>> {
        if let Some(foreign) = records.iter().find(|task| task.user_id != owner) {
            return Err(StoreError::NotOwned(foreign.id));
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for task in records {
            if !owned_row_exists(&tx, "todo_lists", task.list_id, owner)? {
                return Err(StoreError::NotOwned(task.list_id));
            }
            if let Some(tag_id) = task.tag_id {
                if !owned_row_exists(&tx, "tags", tag_id, owner)? {
                    return Err(StoreError::NotOwned(tag_id));
                }
            }
            let changed = tx.execute(
                "INSERT INTO tasks (
                    id,
                    user_id,
                    list_id,
                    text,
                    status,
                    tag_id,
                    ordinal
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT (id) DO UPDATE SET
                    text = excluded.text,
                    status = excluded.status,
                    tag_id = excluded.tag_id,
                    ordinal = excluded.ordinal,
                    updated_at = (strftime('%s', 'now') * 1000)
                WHERE tasks.user_id = excluded.user_id
                  AND tasks.list_id = excluded.list_id;",
                params![
                    task.id.to_string(),
                    task.user_id.to_string(),
                    task.list_id.to_string(),
                    task.text.as_str(),
                    task.status.as_str(),
                    task.tag_id.map(|value| value.to_string()),
                    task.ordinal,
                ],
            )?;
            if changed == 0 {
                return Err(StoreError::NotOwned(task.id));
            }
        }

        let mut saved = Vec::with_capacity(records.len());
        for task in records {
            saved.push(load_required_task(&tx, owner, task.id)?);
        }
        tx.commit()?;
        Ok(saved)
    }

    fn write_order(
        &self,
        owner: UserId,
        list_id: &ListId,
        ids: &[TaskId],
    ) -> StoreResult<Vec<TaskId>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut written = Vec::with_capacity(ids.len());
        {
            let mut stmt = tx.prepare(
                "UPDATE tasks
                 SET ordinal = ?4,
                     updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1
                   AND user_id = ?2
                   AND list_id = ?3;",
            )?;
            for id in ids {
                let changed = stmt.execute(params![
                    id.to_string(),
                    owner.to_string(),
                    list_id.to_string(),
                    written.len() as i64,
                ])?;
                if changed > 0 {
                    written.push(*id);
                }
            }
        }
        tx.commit()?;
        Ok(written)
    }

    fn delete_by_id(&self, id: TaskId, owner: UserId) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, task: &Task) -> StoreResult<Task> {
        self.conn.execute(
            "INSERT INTO tasks (
                id,
                user_id,
                list_id,
                text,
                status,
                tag_id,
                ordinal
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                task.id.to_string(),
                task.user_id.to_string(),
                task.list_id.to_string(),
                task.text.as_str(),
                task.status.as_str(),
                task.tag_id.map(|value| value.to_string()),
                task.ordinal,
            ],
        )?;
        load_required_task(self.conn, task.user_id, task.id)
    }

    fn get_task(&self, owner: UserId, id: TaskId) -> StoreResult<Option<Task>> {
        load_task(self.conn, owner, id)
    }

    fn count_tasks(&self, owner: UserId, list_id: ListId) -> StoreResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*)
             FROM tasks
             WHERE user_id = ?1
               AND list_id = ?2;",
            params![owner.to_string(), list_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn update_task_content(&self, task: &Task) -> StoreResult<Task> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET text = ?3,
                 status = ?4,
                 tag_id = ?5,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND user_id = ?2;",
            params![
                task.id.to_string(),
                task.user_id.to_string(),
                task.text.as_str(),
                task.status.as_str(),
                task.tag_id.map(|value| value.to_string()),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(task.id));
        }
        load_required_task(self.conn, task.user_id, task.id)
    }

    fn list_tasks_by_tag(&self, owner: UserId, tag_id: TagId) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE user_id = ?1
               AND tag_id = ?2
             ORDER BY list_id ASC, ordinal ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query(params![owner.to_string(), tag_id.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn list_tasks_by_status(
        &self,
        owner: UserId,
        status: TaskStatus,
    ) -> StoreResult<Vec<PlateTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                t.id AS id,
                t.user_id AS user_id,
                t.list_id AS list_id,
                t.text AS text,
                t.status AS status,
                t.tag_id AS tag_id,
                t.ordinal AS ordinal,
                l.name AS list_name
             FROM tasks t
             INNER JOIN todo_lists l ON l.id = t.list_id
             WHERE t.user_id = ?1
               AND l.user_id = ?1
               AND t.status = ?2
             ORDER BY l.created_at ASC, l.rowid ASC, t.ordinal ASC, t.rowid ASC;",
        )?;
        let mut rows = stmt.query(params![owner.to_string(), status.as_str()])?;
        let mut plate = Vec::new();
        while let Some(row) = rows.next()? {
            plate.push(PlateTask {
                task: parse_task_row(row)?,
                list_name: row.get("list_name")?,
            });
        }
        Ok(plate)
    }

    fn owns_list(&self, owner: UserId, list_id: ListId) -> StoreResult<bool> {
        owned_row_exists(self.conn, "todo_lists", list_id, owner)
    }

    fn owns_tag(&self, owner: UserId, tag_id: TagId) -> StoreResult<bool> {
        owned_row_exists(self.conn, "tags", tag_id, owner)
    }
}

fn load_task(conn: &Connection, owner: UserId, id: TaskId) -> StoreResult<Option<Task>> {
    let mut stmt = conn.prepare(&format!(
        "{TASK_SELECT_SQL}
         WHERE id = ?1
           AND user_id = ?2;"
    ))?;
    let task = stmt
        .query_row(params![id.to_string(), owner.to_string()], |row| {
            Ok(parse_task_row(row))
        })
        .optional()?;
    task.transpose()
}

fn load_required_task(conn: &Connection, owner: UserId, id: TaskId) -> StoreResult<Task> {
    load_task(conn, owner, id)?.ok_or(StoreError::NotFound(id))
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let list_text: String = row.get("list_id")?;
    let tag_id = row
        .get::<_, Option<String>>("tag_id")?
        .map(|value| parse_uuid(&value, "tasks.tag_id"))
        .transpose()?;

    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    Ok(Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        user_id: parse_uuid(&user_text, "tasks.user_id")?,
        list_id: parse_uuid(&list_text, "tasks.list_id")?,
        text: row.get("text")?,
        status,
        tag_id,
        ordinal: row.get("ordinal")?,
    })
}
