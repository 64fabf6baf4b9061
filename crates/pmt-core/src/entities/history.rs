use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An append-only record summarizing one creation or update of a task.
///
/// `change_log` is the aggregated line built by [`crate::changelog`].
/// `changed_by` is absent when the actor is unknown.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskHistory {
    pub id: String,
    pub task_id: String,
    pub change_log: String,
    pub changed_by: Option<String>,
    pub changed_at: DateTime<Utc>,
}
