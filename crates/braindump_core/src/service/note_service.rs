//! Per-tag note use-cases.

use super::{require_user, ServiceError, ServiceResult};
use crate::model::note::TagNote;
use crate::model::tag::TagId;
use crate::repo::note_repo::NoteRepository;
use crate::session::Session;
use log::debug;
use std::collections::HashMap;

pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves the note of `tag_id`, keeping its id when one already exists.
    ///
    /// Content is stored verbatim; an empty note is still a note.
    pub fn set_note(
        &self,
        session: Option<&Session>,
        tag_id: TagId,
        content: &str,
    ) -> ServiceResult<TagNote> {
        let owner = require_user(session)?;
        if !self.repo.owns_tag(owner, tag_id)? {
            return Err(ServiceError::TagNotFound(tag_id));
        }
        let note = self
            .repo
            .upsert_note(&TagNote::new(owner, tag_id, content))?;
        debug!(
            "event=note_save module=service status=ok chars={}",
            note.content.chars().count()
        );
        Ok(note)
    }

    pub fn get_note(
        &self,
        session: Option<&Session>,
        tag_id: TagId,
    ) -> ServiceResult<Option<TagNote>> {
        let owner = require_user(session)?;
        Ok(self.repo.get_note(owner, tag_id)?)
    }

    /// All of the owner's notes keyed by tag.
    pub fn notes_by_tag(
        &self,
        session: Option<&Session>,
    ) -> ServiceResult<HashMap<TagId, TagNote>> {
        let owner = require_user(session)?;
        let notes = self.repo.list_notes(owner)?;
        Ok(notes.into_iter().map(|note| (note.tag_id, note)).collect())
    }
}
