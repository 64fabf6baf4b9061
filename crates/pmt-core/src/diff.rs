//! Field-level differ for task snapshots.
//!
//! Compares one field of a task before and after a mutation and renders the
//! change as `"<field>: <old> -> <new>"`. Unchanged fields produce nothing.
//!
//! Rendering rules:
//! - free text is single-quoted verbatim; an absent value renders as `''`
//! - enums render by name (`TODO`, `HIGH`)
//! - dates render as ISO calendar strings, or `null` when absent
//! - the assignee renders as the user id, or `null` when unassigned
//!
//! [`diff_tasks`] walks every field in [`TaskField::ORDER`], so the same pair
//! of snapshots always yields the same list in the same order.

use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Task;
use crate::enums::{TaskPriority, TaskStatus};

/// The updatable fields of a task, in diff order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    Title,
    Description,
    Status,
    Priority,
    Deadline,
    EndDate,
    Assignee,
}

impl TaskField {
    pub const ORDER: [Self; 7] = [
        Self::Title,
        Self::Description,
        Self::Status,
        Self::Priority,
        Self::Deadline,
        Self::EndDate,
        Self::Assignee,
    ];

    /// Label used in change-log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Deadline => "deadline",
            Self::EndDate => "endDate",
            Self::Assignee => "assigneeId",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A borrowed field value, tagged with how it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Status(TaskStatus),
    Priority(TaskPriority),
    Date(Option<NaiveDate>),
    Reference(Option<&'a str>),
}

impl FieldValue<'_> {
    /// Read `field` out of a task snapshot.
    #[must_use]
    pub fn of(task: &Task, field: TaskField) -> FieldValue<'_> {
        match field {
            TaskField::Title => FieldValue::Text(Some(task.title.as_str())),
            TaskField::Description => FieldValue::Text(task.description.as_deref()),
            TaskField::Status => FieldValue::Status(task.status),
            TaskField::Priority => FieldValue::Priority(task.priority),
            TaskField::Deadline => FieldValue::Date(task.deadline),
            TaskField::EndDate => FieldValue::Date(task.end_date),
            TaskField::Assignee => FieldValue::Reference(task.assignee_id.as_deref()),
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "'{}'", text.unwrap_or_default()),
            Self::Status(status) => f.write_str(status.as_str()),
            Self::Priority(priority) => f.write_str(priority.as_str()),
            Self::Date(Some(date)) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Reference(Some(id)) => f.write_str(id),
            Self::Date(None) | Self::Reference(None) => f.write_str("null"),
        }
    }
}

/// One changed field with both sides already rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDiff {
    pub field: TaskField,
    pub old: String,
    pub new: String,
}

impl fmt::Display for FieldDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.field, self.old, self.new)
    }
}

/// Compare one field. Returns `None` when the values are equal.
#[must_use]
pub fn diff_field(field: TaskField, old: FieldValue<'_>, new: FieldValue<'_>) -> Option<FieldDiff> {
    if old == new {
        return None;
    }
    Some(FieldDiff {
        field,
        old: old.to_string(),
        new: new.to_string(),
    })
}

/// Compare every updatable field of two snapshots, in [`TaskField::ORDER`].
#[must_use]
pub fn diff_tasks(before: &Task, after: &Task) -> Vec<FieldDiff> {
    TaskField::ORDER
        .into_iter()
        .filter_map(|field| {
            diff_field(
                field,
                FieldValue::of(before, field),
                FieldValue::of(after, field),
            )
        })
        .collect()
}
