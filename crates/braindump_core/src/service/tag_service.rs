//! Tag use-cases.

use super::{normalize_name, require_user, ServiceError, ServiceResult};
use crate::model::tag::{Tag, TagColor, TagId};
use crate::reorder::{sort_by_ordinal, OrderedListReconciler};
use crate::repo::tag_repo::TagRepository;
use crate::repo::{RecordStore, StoreError};
use crate::session::Session;
use log::info;

pub struct TagService<R: TagRepository> {
    repo: R,
}

impl<R: TagRepository> TagService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Appends a tag to the end of the owner's tag bar.
    pub fn create_tag(
        &self,
        session: Option<&Session>,
        name: &str,
        color: TagColor,
    ) -> ServiceResult<Tag> {
        let owner = require_user(session)?;
        let name = normalize_name(name).ok_or(ServiceError::BlankName)?;
        let ordinal = self.repo.count_tags(owner)?;
        let tag = self.repo.insert_tag(&Tag::new(owner, name, color, ordinal))?;
        info!(
            "event=tag_create module=service status=ok ordinal={} color={}",
            tag.ordinal,
            tag.color.as_str()
        );
        Ok(tag)
    }

    pub fn rename_tag(
        &self,
        session: Option<&Session>,
        id: TagId,
        name: &str,
    ) -> ServiceResult<Tag> {
        let name = normalize_name(name).ok_or(ServiceError::BlankName)?;
        self.update(session, id, |tag| tag.name = name)
    }

    pub fn set_color(
        &self,
        session: Option<&Session>,
        id: TagId,
        color: TagColor,
    ) -> ServiceResult<Tag> {
        self.update(session, id, |tag| tag.color = color)
    }

    /// Deletes the tag. Its tasks become untagged and its note is removed.
    pub fn delete_tag(&self, session: Option<&Session>, id: TagId) -> ServiceResult<()> {
        let owner = require_user(session)?;
        self.repo.delete_by_id(id, owner).map_err(|err| match err {
            StoreError::NotFound(_) => ServiceError::TagNotFound(id),
            other => ServiceError::Store(other),
        })
    }

    /// Owner's tags in display order.
    pub fn list_tags(&self, session: Option<&Session>) -> ServiceResult<Vec<Tag>> {
        let owner = require_user(session)?;
        let mut tags = self.repo.list(owner, &())?;
        sort_by_ordinal(&mut tags);
        Ok(tags)
    }

    /// Loads a reconciler over the owner's tags, sharing this service's store.
    pub fn reconciler(
        &self,
        session: Option<&Session>,
    ) -> ServiceResult<OrderedListReconciler<Tag, &R>> {
        let tags = self.list_tags(session)?;
        Ok(OrderedListReconciler::with_items(&self.repo, (), tags))
    }

    fn update(
        &self,
        session: Option<&Session>,
        id: TagId,
        edit: impl FnOnce(&mut Tag),
    ) -> ServiceResult<Tag> {
        let owner = require_user(session)?;
        let mut tag = self
            .repo
            .get_tag(owner, id)?
            .ok_or(ServiceError::TagNotFound(id))?;
        edit(&mut tag);
        Ok(self.repo.update_tag_content(&tag)?)
    }
}
