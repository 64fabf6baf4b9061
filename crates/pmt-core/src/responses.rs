//! Response views returned to transport callers.
//!
//! Views flatten the referenced user into id, address, and display name so
//! callers never need a second lookup.

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Task, TaskHistory, User};
use crate::enums::{TaskPriority, TaskStatus};

/// A task as returned by create, update, get, and list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub deadline: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub assignee_id: Option<String>,
    pub assignee_email: Option<String>,
    pub assignee_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TaskView {
    /// Build a view. `assignee` is the user referenced by `task.assignee_id`.
    #[must_use]
    pub fn new(task: Task, assignee: Option<&User>) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            deadline: task.deadline,
            end_date: task.end_date,
            assignee_id: task.assignee_id,
            assignee_email: assignee.map(|user| user.email.clone()),
            assignee_name: assignee.map(|user| user.display_name().to_string()),
            created_at: task.created_at,
        }
    }
}

/// One history entry, with the actor flattened in.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub id: String,
    pub task_id: String,
    pub change_log: String,
    pub changed_by_id: Option<String>,
    pub changed_by_name: Option<String>,
    pub changed_by_email: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl HistoryView {
    #[must_use]
    pub fn new(entry: TaskHistory, actor: Option<&User>) -> Self {
        Self {
            id: entry.id,
            task_id: entry.task_id,
            change_log: entry.change_log,
            changed_by_id: entry.changed_by,
            changed_by_name: actor.map(|user| user.display_name().to_string()),
            changed_by_email: actor.map(|user| user.email.clone()),
            changed_at: entry.changed_at,
        }
    }
}
