//! Todo list use-cases.

use super::{normalize_name, require_user, ServiceError, ServiceResult};
use crate::model::list::{ListId, TodoList};
use crate::repo::list_repo::ListRepository;
use crate::repo::StoreError;
use crate::session::Session;
use log::info;

pub struct ListService<R: ListRepository> {
    repo: R,
}

impl<R: ListRepository> ListService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a list owned by the session's user.
    pub fn create_list(&self, session: Option<&Session>, name: &str) -> ServiceResult<TodoList> {
        let owner = require_user(session)?;
        let name = normalize_name(name).ok_or(ServiceError::BlankName)?;
        let list = self.repo.insert_list(&TodoList::new(owner, name))?;
        info!("event=list_create module=service status=ok");
        Ok(list)
    }

    pub fn rename_list(
        &self,
        session: Option<&Session>,
        id: ListId,
        name: &str,
    ) -> ServiceResult<TodoList> {
        let owner = require_user(session)?;
        let name = normalize_name(name).ok_or(ServiceError::BlankName)?;
        self.repo
            .rename_list(owner, id, &name)
            .map_err(|err| list_error(err, id))
    }

    /// Deletes a list together with its tasks.
    pub fn delete_list(&self, session: Option<&Session>, id: ListId) -> ServiceResult<()> {
        let owner = require_user(session)?;
        self.repo
            .delete_list(owner, id)
            .map_err(|err| list_error(err, id))?;
        info!("event=list_delete module=service status=ok");
        Ok(())
    }

    /// Owner's lists, oldest first.
    pub fn list_lists(&self, session: Option<&Session>) -> ServiceResult<Vec<TodoList>> {
        let owner = require_user(session)?;
        Ok(self.repo.list_lists(owner)?)
    }
}

fn list_error(err: StoreError, id: ListId) -> ServiceError {
    match err {
        StoreError::NotFound(_) => ServiceError::ListNotFound(id),
        other => ServiceError::Store(other),
    }
}
