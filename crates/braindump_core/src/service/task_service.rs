//! Task use-cases.
//!
//! # Invariants
//! - A task is appended with `ordinal = number of tasks in its list`.
//! - Deleting a task does not renumber the rest; the next committed move
//!   does.
//! - Content edits never touch ordinals.

use super::{normalize_task_text, require_user, ServiceError, ServiceResult};
use crate::model::list::ListId;
use crate::model::tag::TagId;
use crate::model::task::{PlateTask, Task, TaskId, TaskStatus};
use crate::model::UserId;
use crate::reorder::{sort_by_ordinal, OrderedListReconciler};
use crate::repo::task_repo::TaskRepository;
use crate::repo::{RecordStore, StoreError};
use crate::session::Session;
use log::info;

pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Appends a task to the end of `list_id`.
    pub fn add_task(
        &self,
        session: Option<&Session>,
        list_id: ListId,
        text: &str,
        tag_id: Option<TagId>,
    ) -> ServiceResult<Task> {
        let owner = require_user(session)?;
        let text = normalize_task_text(text)?;
        self.ensure_list(owner, list_id)?;
        if let Some(tag_id) = tag_id {
            self.ensure_tag(owner, tag_id)?;
        }

        let ordinal = self.repo.count_tasks(owner, list_id)?;
        let mut task = Task::new(owner, list_id, text, ordinal);
        task.tag_id = tag_id;
        let task = self.repo.insert_task(&task)?;
        info!(
            "event=task_create module=service status=ok ordinal={}",
            task.ordinal
        );
        Ok(task)
    }

    pub fn edit_text(
        &self,
        session: Option<&Session>,
        id: TaskId,
        text: &str,
    ) -> ServiceResult<Task> {
        let text = normalize_task_text(text)?;
        self.update(session, id, |task| task.text = text)
    }

    pub fn set_status(
        &self,
        session: Option<&Session>,
        id: TaskId,
        status: TaskStatus,
    ) -> ServiceResult<Task> {
        self.update(session, id, |task| task.status = status)
    }

    /// Sets or clears the task's tag.
    pub fn assign_tag(
        &self,
        session: Option<&Session>,
        id: TaskId,
        tag_id: Option<TagId>,
    ) -> ServiceResult<Task> {
        if let (Some(session), Some(tag_id)) = (session, tag_id) {
            self.ensure_tag(session.user_id, tag_id)?;
        }
        self.update(session, id, |task| task.tag_id = tag_id)
    }

    pub fn delete_task(&self, session: Option<&Session>, id: TaskId) -> ServiceResult<()> {
        let owner = require_user(session)?;
        self.repo.delete_by_id(id, owner).map_err(|err| match err {
            StoreError::NotFound(_) => ServiceError::TaskNotFound(id),
            other => ServiceError::Store(other),
        })?;
        info!("event=task_delete module=service status=ok");
        Ok(())
    }

    /// Tasks of one list in display order.
    pub fn list_tasks(
        &self,
        session: Option<&Session>,
        list_id: ListId,
    ) -> ServiceResult<Vec<Task>> {
        let owner = require_user(session)?;
        self.ensure_list(owner, list_id)?;
        let mut tasks = self.repo.list(owner, &list_id)?;
        sort_by_ordinal(&mut tasks);
        Ok(tasks)
    }

    /// Tasks carrying `tag_id`, across lists.
    pub fn tasks_for_tag(
        &self,
        session: Option<&Session>,
        tag_id: TagId,
    ) -> ServiceResult<Vec<Task>> {
        let owner = require_user(session)?;
        self.ensure_tag(owner, tag_id)?;
        Ok(self.repo.list_tasks_by_tag(owner, tag_id)?)
    }

    /// Everything the user is currently `doing`, across lists.
    pub fn plate(&self, session: Option<&Session>) -> ServiceResult<Vec<PlateTask>> {
        let owner = require_user(session)?;
        let plate = self.repo.list_tasks_by_status(owner, TaskStatus::Doing)?;
        info!("event=plate_load module=service status=ok count={}", plate.len());
        Ok(plate)
    }

    /// Loads a reconciler over one list's tasks, sharing this service's store.
    pub fn reconciler(
        &self,
        session: Option<&Session>,
        list_id: ListId,
    ) -> ServiceResult<OrderedListReconciler<Task, &R>> {
        let tasks = self.list_tasks(session, list_id)?;
        Ok(OrderedListReconciler::with_items(&self.repo, list_id, tasks))
    }

    fn update(
        &self,
        session: Option<&Session>,
        id: TaskId,
        edit: impl FnOnce(&mut Task),
    ) -> ServiceResult<Task> {
        let owner = require_user(session)?;
        let mut task = self
            .repo
            .get_task(owner, id)?
            .ok_or(ServiceError::TaskNotFound(id))?;
        edit(&mut task);
        Ok(self.repo.update_task_content(&task)?)
    }

    fn ensure_list(&self, owner: UserId, list_id: ListId) -> ServiceResult<()> {
        if self.repo.owns_list(owner, list_id)? {
            Ok(())
        } else {
            Err(ServiceError::ListNotFound(list_id))
        }
    }

    fn ensure_tag(&self, owner: UserId, tag_id: TagId) -> ServiceResult<()> {
        if self.repo.owns_tag(owner, tag_id)? {
            Ok(())
        } else {
            Err(ServiceError::TagNotFound(tag_id))
        }
    }
}
