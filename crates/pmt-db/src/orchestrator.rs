//! Orchestrated task operations.
//!
//! Per request: load, validate existence, apply the update in memory,
//! persist task and history in one transaction, then notify. The diff is
//! always computed against the snapshot loaded at the start of the request.
//! Notification runs after commit and cannot fail the request.

use pmt_core::entities::{Task, User};
use pmt_core::ids::PREFIX_TASK;
use pmt_core::mutator::{
    MutationOutcome, NewTask, TaskUpdateRequest, apply_update, prepare_task, resolve_new_assignee,
    validate_title,
};
use pmt_core::responses::{HistoryView, TaskView};

use crate::error::{DatabaseError, MutationError};
use crate::helpers::now;
use crate::service::PmtService;

impl PmtService {
    /// Create a task in `project_id`, recording a `CREATED:` history row.
    ///
    /// `actor_id` credits the change; an unknown or blank id leaves the row
    /// unattributed.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the project does not exist.
    /// - `InvalidAssignee` when an assignee reference has no match.
    /// - `InvalidInput` when the title is shorter than three characters.
    /// - `PersistenceConflict` / `Unexpected` when the store fails.
    pub async fn create_task(
        &self,
        project_id: &str,
        new: &NewTask,
        actor_id: Option<&str>,
    ) -> Result<TaskView, MutationError> {
        validate_title(&new.title)?;
        let project = self.get_project(project_id).await?;
        let assignee = resolve_new_assignee(new, self).await?;
        let id = self.db().generate_id(PREFIX_TASK).await?;
        let task = prepare_task(id, &project.id, new, assignee.as_ref(), now())?;
        let actor = self.resolve_actor(actor_id).await?;

        let entry = self
            .record_creation(&task, actor.as_ref().map(|user| user.id.as_str()))
            .await?;
        tracing::info!(
            task_id = %task.id,
            project_id = %project.id,
            history_id = %entry.id,
            "task created"
        );

        if let Some(assignee) = &assignee {
            self.notifier()
                .notify_assignment(
                    Some(assignee),
                    Some(&task),
                    Some(&project),
                    actor.as_ref().map(User::display_name),
                )
                .await;
        }

        Ok(TaskView::new(task, assignee.as_ref()))
    }

    /// Apply a partial update to a task.
    ///
    /// A request that changes nothing returns the current state and records
    /// nothing. An effective update records exactly one history row and
    /// notifies the new assignee when the assignment moved to someone.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the task does not exist or belongs to another project.
    /// - `InvalidAssignee` when an assignee reference has no match; nothing
    ///   is written then.
    /// - `InvalidInput` when a new title is shorter than three characters.
    /// - `PersistenceConflict` / `Unexpected` when the store fails.
    pub async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        request: &TaskUpdateRequest,
        actor_id: Option<&str>,
    ) -> Result<TaskView, MutationError> {
        let current = self.load_task(project_id, task_id).await?;
        let outcome = apply_update(&current, request, self).await?;

        if outcome.is_noop() {
            tracing::debug!(task_id, "update changed nothing; not recorded");
            return self.view(current).await;
        }

        let actor = self.resolve_actor(actor_id).await?;
        let entry = self
            .record_update(
                &outcome.task,
                &outcome.diffs,
                actor.as_ref().map(|user| user.id.as_str()),
            )
            .await?;
        tracing::info!(
            task_id,
            project_id,
            changes = outcome.diffs.len(),
            history_id = entry.as_ref().map(|e| e.id.as_str()),
            "task updated"
        );

        self.notify_if_reassigned(&outcome, actor.as_ref()).await;

        let MutationOutcome {
            task, new_assignee, ..
        } = outcome;
        match new_assignee {
            Some(assignee) => Ok(TaskView::new(task, Some(&assignee))),
            None => self.view(task).await,
        }
    }

    /// # Errors
    ///
    /// Returns `NotFound` when the task does not exist or belongs to another
    /// project.
    pub async fn get_task(
        &self,
        project_id: &str,
        task_id: &str,
    ) -> Result<TaskView, MutationError> {
        let task = self.load_task(project_id, task_id).await?;
        self.view(task).await
    }

    /// Tasks of a project, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the project does not exist.
    pub async fn list_tasks(&self, project_id: &str) -> Result<Vec<TaskView>, MutationError> {
        let project = self.get_project(project_id).await?;
        let tasks = self.list_project_tasks(&project.id).await?;
        let mut views = Vec::with_capacity(tasks.len());
        for task in tasks {
            views.push(self.view(task).await?);
        }
        Ok(views)
    }

    /// History of a task, newest first, with actors resolved.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the task does not exist or belongs to another
    /// project.
    pub async fn task_history(
        &self,
        project_id: &str,
        task_id: &str,
    ) -> Result<Vec<HistoryView>, MutationError> {
        let task = self.load_task(project_id, task_id).await?;
        let entries = self.list_history_for_task(&task.id).await?;
        let mut views = Vec::with_capacity(entries.len());
        for entry in entries {
            let actor = match entry.changed_by.as_deref() {
                Some(id) => self.find_user(id).await?,
                None => None,
            };
            views.push(HistoryView::new(entry, actor.as_ref()));
        }
        Ok(views)
    }

    /// Load a task and check it belongs to `project_id`.
    async fn load_task(&self, project_id: &str, task_id: &str) -> Result<Task, MutationError> {
        match self.find_task(task_id).await? {
            Some(task) if task.project_id == project_id => Ok(task),
            Some(task) => {
                tracing::debug!(
                    task_id,
                    project_id,
                    owner = %task.project_id,
                    "task requested through the wrong project"
                );
                Err(MutationError::not_found("task", task_id))
            }
            None => Err(MutationError::not_found("task", task_id)),
        }
    }

    /// The acting user, if the id is set and known.
    async fn resolve_actor(&self, actor_id: Option<&str>) -> Result<Option<User>, DatabaseError> {
        let Some(id) = actor_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(None);
        };
        let actor = self.find_user(id).await?;
        if actor.is_none() {
            tracing::debug!(actor_id = id, "unknown actor; change left unattributed");
        }
        Ok(actor)
    }

    async fn view(&self, task: Task) -> Result<TaskView, MutationError> {
        let assignee = match task.assignee_id.as_deref() {
            Some(id) => self.find_user(id).await?,
            None => None,
        };
        Ok(TaskView::new(task, assignee.as_ref()))
    }

    /// Notify the new assignee. Lookup failures only cost the project name.
    async fn notify_if_reassigned(&self, outcome: &MutationOutcome, actor: Option<&User>) {
        if !outcome.should_notify() {
            return;
        }
        let project = match self.find_project(&outcome.task.project_id).await {
            Ok(project) => project,
            Err(error) => {
                tracing::warn!(
                    %error,
                    task_id = %outcome.task.id,
                    "project lookup for notification failed"
                );
                None
            }
        };
        self.notifier()
            .notify_assignment(
                outcome.new_assignee.as_ref(),
                Some(&outcome.task),
                project.as_ref(),
                actor.map(User::display_name),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{test_project, test_service};
    use pmt_core::mutator::TaskUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn wrong_project_is_not_found() {
        let svc = test_service().await;
        let project = test_project(&svc).await;
        let other = svc.create_project("Other").await.unwrap();
        let task = svc
            .create_task(&project.id, &NewTask::titled("Fix bug"), None)
            .await
            .unwrap();

        let result = svc
            .update_task(
                &other.id,
                &task.id,
                &TaskUpdateBuilder::new().title("Hijack").build(),
                None,
            )
            .await;
        assert!(matches!(result, Err(MutationError::NotFound { entity: "task", .. })));
        assert_eq!(svc.get_task(&project.id, &task.id).await.unwrap().title, "Fix bug");
    }

    #[tokio::test]
    async fn blank_actor_is_unattributed() {
        let svc = test_service().await;
        assert_eq!(svc.resolve_actor(Some("  ")).await.unwrap(), None);
        assert_eq!(svc.resolve_actor(Some("usr-ghost")).await.unwrap(), None);
        assert_eq!(svc.resolve_actor(None).await.unwrap(), None);
    }
}
