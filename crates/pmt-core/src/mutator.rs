//! Task mutator: applies partial updates to a task snapshot.
//!
//! The mutator never touches storage. Assignee references are resolved
//! through a [`UserDirectory`] up front, before any field is applied, so a
//! failed lookup leaves nothing half-applied. The field changes themselves
//! are computed by [`diff_tasks`] against the snapshot the caller loaded.
//!
//! Field policy:
//!
//! | field            | `Set("")` / blank      | unparsable            |
//! |------------------|------------------------|-----------------------|
//! | `title`          | ignored                | n/a (min 3 chars)     |
//! | `description`    | cleared                | n/a                   |
//! | `status`         | `TODO`                 | `TODO`                |
//! | `priority`       | `MEDIUM`               | `MEDIUM`              |
//! | `deadline`       | cleared                | cleared               |
//! | `endDate`        | cleared                | cleared               |
//! | `assigneeId`     | unassigned             | `AssigneeNotFound`    |
//! | `assigneeEmail`  | unassigned             | `AssigneeNotFound`    |
//!
//! `assigneeId` takes precedence over `assigneeEmail` when both are set.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::{FieldDiff, diff_tasks};
use crate::entities::{Task, User};
use crate::enums::{TaskPriority, TaskStatus};
use crate::errors::CoreError;
use crate::patch::Patch;

/// Minimum title length, counted in characters after trimming.
pub const MIN_TITLE_LEN: usize = 3;

/// Lookup of assignable users. Implemented by the store.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_by_id(&self, id: &str) -> Result<Option<User>, CoreError>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Partial update for a task. Every field is independently `Unset` or `Set`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskUpdateRequest {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub title: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub status: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub priority: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub deadline: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub end_date: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub assignee_id: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub assignee_email: Patch<String>,
}

pub struct TaskUpdateBuilder(TaskUpdateRequest);

impl TaskUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TaskUpdateRequest::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Patch::Set(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Patch::Set(description.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.0.status = Patch::Set(status.into());
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.0.priority = Patch::Set(priority.into());
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: impl Into<String>) -> Self {
        self.0.deadline = Patch::Set(deadline.into());
        self
    }

    #[must_use]
    pub fn end_date(mut self, end_date: impl Into<String>) -> Self {
        self.0.end_date = Patch::Set(end_date.into());
        self
    }

    #[must_use]
    pub fn assignee_id(mut self, assignee_id: impl Into<String>) -> Self {
        self.0.assignee_id = Patch::Set(assignee_id.into());
        self
    }

    #[must_use]
    pub fn assignee_email(mut self, assignee_email: impl Into<String>) -> Self {
        self.0.assignee_email = Patch::Set(assignee_email.into());
        self
    }

    #[must_use]
    pub fn build(self) -> TaskUpdateRequest {
        self.0
    }
}

impl Default for TaskUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Input for creating a task. Absent optional fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
    pub end_date: Option<String>,
    pub assignee_id: Option<String>,
    pub assignee_email: Option<String>,
}

impl NewTask {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an ISO calendar date (`yyyy-mm-dd`). Blank or invalid input is `None`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn non_blank(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Trim a title and check its length.
///
/// # Errors
///
/// Returns `CoreError::Validation` when the trimmed title is too short.
pub fn validate_title(raw: &str) -> Result<String, CoreError> {
    let title = raw.trim();
    if title.chars().count() < MIN_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at least {MIN_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

// ---------------------------------------------------------------------------
// Assignee resolution
// ---------------------------------------------------------------------------

/// What the request asks for, before any lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssigneeRef<'a> {
    Id(&'a str),
    Email(&'a str),
    Clear,
}

fn requested_assignee<'a>(
    id: &'a Patch<String>,
    email: &'a Patch<String>,
) -> Option<AssigneeRef<'a>> {
    let (raw, by_id) = match (id, email) {
        (Patch::Set(raw), _) => (raw.trim(), true),
        (Patch::Unset, Patch::Set(raw)) => (raw.trim(), false),
        (Patch::Unset, Patch::Unset) => return None,
    };
    Some(if raw.is_empty() {
        AssigneeRef::Clear
    } else if by_id {
        AssigneeRef::Id(raw)
    } else {
        AssigneeRef::Email(raw)
    })
}

/// Outcome of assignee resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeChange {
    Keep,
    Clear,
    Assign(User),
}

async fn lookup(
    reference: AssigneeRef<'_>,
    directory: &dyn UserDirectory,
) -> Result<AssigneeChange, CoreError> {
    match reference {
        AssigneeRef::Clear => Ok(AssigneeChange::Clear),
        AssigneeRef::Id(id) => directory
            .user_by_id(id)
            .await?
            .map(AssigneeChange::Assign)
            .ok_or_else(|| CoreError::AssigneeNotFound {
                field: "assigneeId",
                value: id.to_string(),
            }),
        AssigneeRef::Email(email) => directory
            .user_by_email(email)
            .await?
            .map(AssigneeChange::Assign)
            .ok_or_else(|| CoreError::AssigneeNotFound {
                field: "assigneeEmail",
                value: email.to_string(),
            }),
    }
}

/// Resolve the assignee part of an update against the current snapshot.
///
/// An identifier equal to the current assignee needs no lookup.
///
/// # Errors
///
/// Returns `CoreError::AssigneeNotFound` when a non-blank reference has no
/// match, or the directory's own error when the lookup fails.
pub async fn resolve_assignee(
    current: &Task,
    request: &TaskUpdateRequest,
    directory: &dyn UserDirectory,
) -> Result<AssigneeChange, CoreError> {
    match requested_assignee(&request.assignee_id, &request.assignee_email) {
        None => Ok(AssigneeChange::Keep),
        Some(AssigneeRef::Id(id)) if current.assignee_id.as_deref() == Some(id) => {
            Ok(AssigneeChange::Keep)
        }
        Some(reference) => lookup(reference, directory).await,
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Result of applying an update to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// The snapshot after the update. Equal to the input when `diffs` is empty.
    pub task: Task,
    /// Changed fields in diff order.
    pub diffs: Vec<FieldDiff>,
    /// Whether the assignee differs from the one in the input snapshot.
    pub assignment_changed: bool,
    /// The newly assigned user, when the assignment changed to someone.
    pub new_assignee: Option<User>,
}

impl MutationOutcome {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Rendered diff lines, e.g. `"status: TODO -> DONE"`.
    #[must_use]
    pub fn change_lines(&self) -> Vec<String> {
        self.diffs.iter().map(ToString::to_string).collect()
    }

    /// Notify only when the assignee changed to a non-null user.
    #[must_use]
    pub const fn should_notify(&self) -> bool {
        self.assignment_changed && self.new_assignee.is_some()
    }
}

/// Apply an update whose assignee has already been resolved.
///
/// # Errors
///
/// Returns `CoreError::Validation` when a non-blank new title is shorter than
/// [`MIN_TITLE_LEN`].
pub fn apply_resolved(
    current: &Task,
    request: &TaskUpdateRequest,
    assignee: AssigneeChange,
) -> Result<MutationOutcome, CoreError> {
    let mut next = current.clone();

    if let Some(raw) = request.title.as_deref() {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed != current.title {
            next.title = validate_title(trimmed)?;
        }
    }
    if let Some(raw) = request.description.as_deref() {
        next.description = non_blank(raw);
    }
    if let Some(raw) = request.status.as_deref() {
        next.status = TaskStatus::parse_or_default(Some(raw));
    }
    if let Some(raw) = request.priority.as_deref() {
        next.priority = TaskPriority::parse_or_default(Some(raw));
    }
    if let Some(raw) = request.deadline.as_deref() {
        next.deadline = parse_date(raw);
    }
    if let Some(raw) = request.end_date.as_deref() {
        next.end_date = parse_date(raw);
    }

    let assigned = match assignee {
        AssigneeChange::Keep => None,
        AssigneeChange::Clear => {
            next.assignee_id = None;
            None
        }
        AssigneeChange::Assign(user) => {
            next.assignee_id = Some(user.id.clone());
            Some(user)
        }
    };

    let diffs = diff_tasks(current, &next);
    let assignment_changed = current.assignee_id != next.assignee_id;
    let new_assignee = assigned.filter(|_| assignment_changed);

    Ok(MutationOutcome {
        task: next,
        diffs,
        assignment_changed,
        new_assignee,
    })
}

/// Apply a partial update to `current`, resolving assignees via `directory`.
///
/// # Errors
///
/// Returns `CoreError::AssigneeNotFound` for an unknown assignee reference,
/// `CoreError::Validation` for a too-short title, or the directory's error.
pub async fn apply_update(
    current: &Task,
    request: &TaskUpdateRequest,
    directory: &dyn UserDirectory,
) -> Result<MutationOutcome, CoreError> {
    let assignee = resolve_assignee(current, request, directory).await?;
    let outcome = apply_resolved(current, request, assignee)?;
    tracing::debug!(
        task_id = %current.id,
        changes = outcome.diffs.len(),
        assignment_changed = outcome.assignment_changed,
        "applied task update"
    );
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Resolve the assignee of a new task, if one was requested.
///
/// A blank identifier has nothing to clear here, so the address is tried.
///
/// # Errors
///
/// Returns `CoreError::AssigneeNotFound` when a non-blank reference has no match.
pub async fn resolve_new_assignee(
    new: &NewTask,
    directory: &dyn UserDirectory,
) -> Result<Option<User>, CoreError> {
    let id = Patch::from(new.assignee_id.as_deref().and_then(non_blank));
    let email = Patch::from(new.assignee_email.clone());
    match requested_assignee(&id, &email) {
        None | Some(AssigneeRef::Clear) => Ok(None),
        Some(reference) => match lookup(reference, directory).await? {
            AssigneeChange::Assign(user) => Ok(Some(user)),
            AssigneeChange::Keep | AssigneeChange::Clear => Ok(None),
        },
    }
}

/// Build the snapshot of a new task. Status and priority default when absent
/// or unparsable; dates that do not parse are dropped.
///
/// # Errors
///
/// Returns `CoreError::Validation` when the trimmed title is too short.
pub fn prepare_task(
    id: String,
    project_id: &str,
    new: &NewTask,
    assignee: Option<&User>,
    created_at: DateTime<Utc>,
) -> Result<Task, CoreError> {
    Ok(Task {
        id,
        project_id: project_id.to_string(),
        title: validate_title(&new.title)?,
        description: new.description.as_deref().and_then(non_blank),
        status: TaskStatus::parse_or_default(new.status.as_deref()),
        priority: TaskPriority::parse_or_default(new.priority.as_deref()),
        deadline: new.deadline.as_deref().and_then(parse_date),
        end_date: new.end_date.as_deref().and_then(parse_date),
        assignee_id: assignee.map(|user| user.id.clone()),
        created_at,
    })
}
