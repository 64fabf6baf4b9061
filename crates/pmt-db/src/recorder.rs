//! Audit recording: one history row per creation or effective update,
//! written in the same transaction as the task itself.

use chrono::{DateTime, Utc};

use pmt_core::changelog::{creation_line, update_line};
use pmt_core::diff::FieldDiff;
use pmt_core::entities::{Task, TaskHistory};
use pmt_core::ids::PREFIX_HISTORY;

use crate::error::DatabaseError;
use crate::helpers::now;
use crate::repos::history::insert_history;
use crate::repos::task::{insert_task, save_task};
use crate::service::PmtService;

/// How the task row reaches the store.
#[derive(Debug, Clone, Copy)]
enum TaskWrite<'a> {
    Insert(&'a Task),
    Save(&'a Task),
}

/// The history row for a newly created task.
#[must_use]
pub fn creation_entry(
    id: String,
    task: &Task,
    actor_id: Option<&str>,
    at: DateTime<Utc>,
) -> TaskHistory {
    TaskHistory {
        id,
        task_id: task.id.clone(),
        change_log: creation_line(task),
        changed_by: actor_id.map(String::from),
        changed_at: at,
    }
}

/// The history row for an update, or `None` when nothing changed.
#[must_use]
pub fn update_entry(
    id: String,
    task_id: &str,
    diffs: &[FieldDiff],
    actor_id: Option<&str>,
    at: DateTime<Utc>,
) -> Option<TaskHistory> {
    update_line(diffs).map(|change_log| TaskHistory {
        id,
        task_id: task_id.to_string(),
        change_log,
        changed_by: actor_id.map(String::from),
        changed_at: at,
    })
}

/// Write the task and its history row atomically. Rolls back when either
/// write fails.
async fn commit_with_history(
    conn: &libsql::Connection,
    write: TaskWrite<'_>,
    entry: &TaskHistory,
) -> Result<(), DatabaseError> {
    let tx = conn.transaction().await?;
    let written = async {
        match write {
            TaskWrite::Insert(task) => insert_task(&tx, task).await?,
            TaskWrite::Save(task) => save_task(&tx, task).await?,
        }
        insert_history(&tx, entry).await
    }
    .await;

    match written {
        Ok(()) => {
            tx.commit().await?;
            Ok(())
        }
        Err(error) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(%rollback, task_id = %entry.task_id, "rollback failed");
            }
            Err(error)
        }
    }
}

impl PmtService {
    /// Insert a new task together with its `CREATED:` history row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if either write fails; nothing is persisted then.
    pub async fn record_creation(
        &self,
        task: &Task,
        actor_id: Option<&str>,
    ) -> Result<TaskHistory, DatabaseError> {
        let id = self.db().generate_id(PREFIX_HISTORY).await?;
        let entry = creation_entry(id, task, actor_id, now());
        commit_with_history(self.db().conn(), TaskWrite::Insert(task), &entry).await?;
        Ok(entry)
    }

    /// Save an updated task together with its `UPDATE:` history row.
    ///
    /// An empty diff list writes nothing and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if either write fails; the task keeps its
    /// previous state then.
    pub async fn record_update(
        &self,
        task: &Task,
        diffs: &[FieldDiff],
        actor_id: Option<&str>,
    ) -> Result<Option<TaskHistory>, DatabaseError> {
        let id = self.db().generate_id(PREFIX_HISTORY).await?;
        let Some(entry) = update_entry(id, &task.id, diffs, actor_id, now()) else {
            return Ok(None);
        };
        commit_with_history(self.db().conn(), TaskWrite::Save(task), &entry).await?;
        Ok(Some(entry))
    }
}
