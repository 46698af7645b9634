//! Per-tag note store over the `notes` table.
//!
//! # Invariants
//! - At most one note per `(user_id, tag_id)`.
//! - Saving an existing tag's note keeps its id.

use super::schema::{ensure_table_ready, owned_row_exists, parse_uuid};
use super::{StoreError, StoreResult};
use crate::model::note::TagNote;
use crate::model::tag::TagId;
use crate::model::UserId;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT id, user_id, tag_id, content FROM notes";

pub trait NoteRepository {
    fn get_note(&self, owner: UserId, tag_id: TagId) -> StoreResult<Option<TagNote>>;
    /// Owner's notes ordered like the owner's tags.
    fn list_notes(&self, owner: UserId) -> StoreResult<Vec<TagNote>>;
    /// Replaces the content of the tag's note, creating it with `note.id`
    /// when the tag has none yet.
    fn upsert_note(&self, note: &TagNote) -> StoreResult<TagNote>;
    /// Whether the tag exists and belongs to `owner`.
    fn owns_tag(&self, owner: UserId, tag_id: TagId) -> StoreResult<bool>;
}

pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_table_ready(conn, "notes", &["id", "user_id", "tag_id", "content"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn get_note(&self, owner: UserId, tag_id: TagId) -> StoreResult<Option<TagNote>> {
        load_note(self.conn, owner, tag_id)
    }

    fn list_notes(&self, owner: UserId) -> StoreResult<Vec<TagNote>> {
        let mut stmt = self.conn.prepare(
            "SELECT n.id AS id, n.user_id AS user_id, n.tag_id AS tag_id, n.content AS content
             FROM notes n
             INNER JOIN tags t ON t.id = n.tag_id
             WHERE n.user_id = ?1
             ORDER BY t.ordinal ASC, t.rowid ASC;",
        )?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn upsert_note(&self, note: &TagNote) -> StoreResult<TagNote> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let existing = load_note(&tx, note.user_id, note.tag_id)?;
        match existing {
            Some(current) => {
                tx.execute(
                    "UPDATE notes
                     SET content = ?2,
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE id = ?1;",
                    params![current.id.to_string(), note.content.as_str()],
                )?;
            }
            None => {
                tx.execute(
                    "INSERT INTO notes (id, user_id, tag_id, content)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        note.id.to_string(),
                        note.user_id.to_string(),
                        note.tag_id.to_string(),
                        note.content.as_str(),
                    ],
                )?;
            }
        }
        let saved =
            load_note(&tx, note.user_id, note.tag_id)?.ok_or(StoreError::NotFound(note.tag_id))?;
        tx.commit()?;
        Ok(saved)
    }

    fn owns_tag(&self, owner: UserId, tag_id: TagId) -> StoreResult<bool> {
        owned_row_exists(self.conn, "tags", tag_id, owner)
    }
}

fn load_note(conn: &Connection, owner: UserId, tag_id: TagId) -> StoreResult<Option<TagNote>> {
    let mut stmt = conn.prepare(&format!(
        "{NOTE_SELECT_SQL}
         WHERE user_id = ?1
           AND tag_id = ?2;"
    ))?;
    let note = stmt
        .query_row(params![owner.to_string(), tag_id.to_string()], |row| {
            Ok(parse_note_row(row))
        })
        .optional()?;
    note.transpose()
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<TagNote> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let tag_text: String = row.get("tag_id")?;
    Ok(TagNote {
        id: parse_uuid(&id_text, "notes.id")?,
        user_id: parse_uuid(&user_text, "notes.user_id")?,
        tag_id: parse_uuid(&tag_text, "notes.tag_id")?,
        content: row.get("content")?,
    })
}
