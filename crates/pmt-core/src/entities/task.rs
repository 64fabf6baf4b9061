use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{TaskPriority, TaskStatus};

/// A trackable unit of work belonging to a project.
///
/// `created_at` is set once at creation and never rewritten by updates.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub deadline: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub assignee_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
