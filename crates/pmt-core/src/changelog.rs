//! Change-log lines stored in task history.
//!
//! One history row per event, with the whole event folded into a single
//! line:
//!
//! ```text
//! CREATED: title='Fix bug'; status=TODO; priority=HIGH
//! UPDATE: status: TODO -> DONE; assigneeId: null -> usr-1a2b3c4d
//! ```

use crate::diff::FieldDiff;
use crate::entities::Task;

pub const CREATED_PREFIX: &str = "CREATED: ";
pub const UPDATE_PREFIX: &str = "UPDATE: ";
pub const SEPARATOR: &str = "; ";

/// Describe a newly created task. Title, status, and priority are always
/// present; the other fields only when set.
#[must_use]
pub fn creation_line(task: &Task) -> String {
    let mut parts = vec![format!("title='{}'", task.title)];
    if let Some(description) = &task.description {
        parts.push(format!("description='{description}'"));
    }
    parts.push(format!("status={}", task.status));
    parts.push(format!("priority={}", task.priority));
    if let Some(deadline) = task.deadline {
        parts.push(format!("deadline={}", deadline.format("%Y-%m-%d")));
    }
    if let Some(end_date) = task.end_date {
        parts.push(format!("endDate={}", end_date.format("%Y-%m-%d")));
    }
    if let Some(assignee_id) = &task.assignee_id {
        parts.push(format!("assigneeId={assignee_id}"));
    }
    format!("{CREATED_PREFIX}{}", parts.join(SEPARATOR))
}

/// Fold the diffs of one update into a single line.
///
/// Returns `None` for an empty diff list: a no-op update is not recorded.
#[must_use]
pub fn update_line(diffs: &[FieldDiff]) -> Option<String> {
    if diffs.is_empty() {
        return None;
    }
    let joined = diffs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    Some(format!("{UPDATE_PREFIX}{joined}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::TaskField;
    use crate::enums::{TaskPriority, TaskStatus};
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;

    fn task() -> Task {
        Task {
            id: "tsk-1".into(),
            project_id: "prj-1".into(),
            title: "Fix bug".into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            deadline: None,
            end_date: None,
            assignee_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn creation_line_minimal() {
        assert_eq!(
            creation_line(&task()),
            "CREATED: title='Fix bug'; status=TODO; priority=HIGH"
        );
    }

    #[test]
    fn creation_line_all_fields() {
        let task = Task {
            description: Some("Null pointer in parser".into()),
            deadline: NaiveDate::from_ymd_opt(2026, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 5),
            assignee_id: Some("usr-1".into()),
            ..task()
        };
        assert_eq!(
            creation_line(&task),
            "CREATED: title='Fix bug'; description='Null pointer in parser'; status=TODO; \
             priority=HIGH; deadline=2026-03-01; endDate=2026-03-05; assigneeId=usr-1"
        );
    }

    #[test]
    fn update_line_joins_diffs() {
        let diffs = vec![
            FieldDiff {
                field: TaskField::Title,
                old: "'Alpha'".into(),
                new: "'Beta'".into(),
            },
            FieldDiff {
                field: TaskField::Status,
                old: "TODO".into(),
                new: "DONE".into(),
            },
        ];
        assert_eq!(
            update_line(&diffs).as_deref(),
            Some("UPDATE: title: 'Alpha' -> 'Beta'; status: TODO -> DONE")
        );
    }

    #[test]
    fn update_line_empty_is_none() {
        assert_eq!(update_line(&[]), None);
    }
}
