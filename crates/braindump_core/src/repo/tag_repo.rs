//! Tag store over the `tags` table.
//!
//! # Invariants
//! - The ordinal scope is the owner's whole tag set.
//! - Reordering writes ordinals only; name and color stay untouched.
//! - Deleting a tag clears `tasks.tag_id` and removes the tag's note through
//!   foreign keys.

use super::schema::{ensure_table_ready, parse_uuid};
use super::{RecordStore, StoreError, StoreResult};
use crate::model::tag::{Tag, TagColor, TagId};
use crate::model::UserId;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const TAG_SELECT_SQL: &str = "SELECT id, user_id, name, color, ordinal FROM tags";

/// Tag persistence beyond the generic record store contract.
pub trait TagRepository: RecordStore<Tag, Scope = ()> {
    fn insert_tag(&self, tag: &Tag) -> StoreResult<Tag>;
    fn get_tag(&self, owner: UserId, id: TagId) -> StoreResult<Option<Tag>>;
    fn count_tags(&self, owner: UserId) -> StoreResult<i64>;
    /// Writes name and color. Ordinal is left alone.
    fn update_tag_content(&self, tag: &Tag) -> StoreResult<Tag>;
}

/// SQLite-backed tag store.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_table_ready(conn, "tags", &["id", "user_id", "name", "color", "ordinal"])?;
        Ok(Self { conn })
    }
}

impl RecordStore<Tag> for SqliteTagRepository<'_> {
    type Scope = ();

    fn list(&self, owner: UserId, _scope: &()) -> StoreResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TAG_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY ordinal ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(parse_tag_row(row)?);
        }
        Ok(tags)
    }

    fn upsert_many(&self, owner: UserId, records: &[Tag]) -> StoreResult<Vec<Tag>> {
        if let Some(foreign) = records.iter().find(|tag| tag.user_id != owner) {
            return Err(StoreError::NotOwned(foreign.id));
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for tag in records {
            let changed = tx.execute(
                "INSERT INTO tags (id, user_id, name, color, ordinal)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (id) DO UPDATE SET
                    name = excluded.name,
                    color = excluded.color,
                    ordinal = excluded.ordinal,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE tags.user_id = excluded.user_id;",
                params![
                    tag.id.to_string(),
                    tag.user_id.to_string(),
                    tag.name.as_str(),
                    tag.color.as_str(),
                    tag.ordinal,
                ],
            )?;
            if changed == 0 {
                return Err(StoreError::NotOwned(tag.id));
            }
        }

        let mut saved = Vec::with_capacity(records.len());
        for tag in records {
            saved.push(load_required_tag(&tx, owner, tag.id)?);
        }
        tx.commit()?;
        Ok(saved)
    }

    fn write_order(&self, owner: UserId, _scope: &(), ids: &[TagId]) -> StoreResult<Vec<TagId>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut written = Vec::with_capacity(ids.len());
        {
            let mut stmt = tx.prepare(
                "UPDATE tags
                 SET ordinal = ?3,
                     updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1
                   AND user_id = ?2;",
            )?;
            for id in ids {
                let changed =
                    stmt.execute(params![id.to_string(), owner.to_string(), written.len() as i64])?;
                if changed > 0 {
                    written.push(*id);
                }
            }
        }
        tx.commit()?;
        Ok(written)
    }

    fn delete_by_id(&self, id: TagId, owner: UserId) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tags WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!("event=tag_delete module=repo status=ok");
        Ok(())
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn insert_tag(&self, tag: &Tag) -> StoreResult<Tag> {
        self.conn.execute(
            "INSERT INTO tags (id, user_id, name, color, ordinal)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                tag.id.to_string(),
                tag.user_id.to_string(),
                tag.name.as_str(),
                tag.color.as_str(),
                tag.ordinal,
            ],
        )?;
        load_required_tag(self.conn, tag.user_id, tag.id)
    }

    fn get_tag(&self, owner: UserId, id: TagId) -> StoreResult<Option<Tag>> {
        load_tag(self.conn, owner, id)
    }

    fn count_tags(&self, owner: UserId) -> StoreResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM tags WHERE user_id = ?1;",
            [owner.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn update_tag_content(&self, tag: &Tag) -> StoreResult<Tag> {
        let changed = self.conn.execute(
            "UPDATE tags
             SET name = ?3,
                 color = ?4,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND user_id = ?2;",
            params![
                tag.id.to_string(),
                tag.user_id.to_string(),
                tag.name.as_str(),
                tag.color.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(tag.id));
        }
        load_required_tag(self.conn, tag.user_id, tag.id)
    }
}

fn load_tag(conn: &Connection, owner: UserId, id: TagId) -> StoreResult<Option<Tag>> {
    let mut stmt = conn.prepare(&format!(
        "{TAG_SELECT_SQL}
         WHERE id = ?1
           AND user_id = ?2;"
    ))?;
    let tag = stmt
        .query_row(params![id.to_string(), owner.to_string()], |row| {
            Ok(parse_tag_row(row))
        })
        .optional()?;
    tag.transpose()
}

fn load_required_tag(conn: &Connection, owner: UserId, id: TagId) -> StoreResult<Tag> {
    load_tag(conn, owner, id)?.ok_or(StoreError::NotFound(id))
}

fn parse_tag_row(row: &Row<'_>) -> StoreResult<Tag> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let color_text: String = row.get("color")?;
    let color = TagColor::parse(&color_text).ok_or_else(|| {
        StoreError::InvalidData(format!("invalid tag color `{color_text}` in tags.color"))
    })?;

    Ok(Tag {
        id: parse_uuid(&id_text, "tags.id")?,
        user_id: parse_uuid(&user_text, "tags.user_id")?,
        name: row.get("name")?,
        color,
        ordinal: row.get("ordinal")?,
    })
}
