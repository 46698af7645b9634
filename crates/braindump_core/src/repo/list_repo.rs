//! Todo list store over the `todo_lists` table.
//!
//! Lists are shown in creation order and carry no ordinal.

use super::schema::{ensure_table_ready, parse_uuid};
use super::{StoreError, StoreResult};
use crate::model::list::{ListId, TodoList};
use crate::model::UserId;
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait ListRepository {
    fn insert_list(&self, list: &TodoList) -> StoreResult<TodoList>;
    fn get_list(&self, owner: UserId, id: ListId) -> StoreResult<Option<TodoList>>;
    /// Owner's lists, oldest first.
    fn list_lists(&self, owner: UserId) -> StoreResult<Vec<TodoList>>;
    fn rename_list(&self, owner: UserId, id: ListId, name: &str) -> StoreResult<TodoList>;
    /// Deletes the list and, by cascade, its tasks.
    fn delete_list(&self, owner: UserId, id: ListId) -> StoreResult<()>;
}

pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_table_ready(conn, "todo_lists", &["id", "user_id", "name", "created_at"])?;
        Ok(Self { conn })
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn insert_list(&self, list: &TodoList) -> StoreResult<TodoList> {
        self.conn.execute(
            "INSERT INTO todo_lists (id, user_id, name) VALUES (?1, ?2, ?3);",
            params![
                list.id.to_string(),
                list.user_id.to_string(),
                list.name.as_str()
            ],
        )?;
        self.get_list(list.user_id, list.id)?
            .ok_or(StoreError::NotFound(list.id))
    }

    fn get_list(&self, owner: UserId, id: ListId) -> StoreResult<Option<TodoList>> {
        let list = self
            .conn
            .query_row(
                "SELECT id, user_id, name
                 FROM todo_lists
                 WHERE id = ?1
                   AND user_id = ?2;",
                params![id.to_string(), owner.to_string()],
                |row| Ok(parse_list_row(row)),
            )
            .optional()?;
        list.transpose()
    }

    fn list_lists(&self, owner: UserId) -> StoreResult<Vec<TodoList>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name
             FROM todo_lists
             WHERE user_id = ?1
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }
        Ok(lists)
    }

    fn rename_list(&self, owner: UserId, id: ListId, name: &str) -> StoreResult<TodoList> {
        let changed = self.conn.execute(
            "UPDATE todo_lists
             SET name = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND user_id = ?2;",
            params![id.to_string(), owner.to_string(), name],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        self.get_list(owner, id)?.ok_or(StoreError::NotFound(id))
    }

    fn delete_list(&self, owner: UserId, id: ListId) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM todo_lists WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_list_row(row: &Row<'_>) -> StoreResult<TodoList> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    Ok(TodoList {
        id: parse_uuid(&id_text, "todo_lists.id")?,
        user_id: parse_uuid(&user_text, "todo_lists.user_id")?,
        name: row.get("name")?,
    })
}
