//! Outgoing messages and the assignment template.

use std::fmt::Write as _;

use pmt_core::entities::{Project, Task, User};
use serde::{Deserialize, Serialize};

/// Label used when the person who made the assignment is unknown.
pub const SYSTEM_ACTOR: &str = "System";

/// A plain-text message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Builder for the "task assigned to you" message.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentNotice<'a> {
    pub assignee: &'a User,
    pub task: &'a Task,
    pub project: Option<&'a Project>,
    pub actor_display: Option<&'a str>,
}

impl AssignmentNotice<'_> {
    /// Link to the task page: `{base}/projects/{project_id}/tasks/{task_id}`.
    #[must_use]
    pub fn deep_link(&self, frontend_base: &str) -> String {
        format!(
            "{}/projects/{}/tasks/{}",
            frontend_base.trim_end_matches('/'),
            self.task.project_id,
            self.task.id
        )
    }

    #[must_use]
    pub fn subject(&self) -> String {
        format!("[PMT] New task assigned: {}", self.task.title)
    }

    #[must_use]
    pub fn body(&self, frontend_base: &str) -> String {
        let task = self.task;
        let actor = self
            .actor_display
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(SYSTEM_ACTOR);

        let mut body = String::from("Hello,\n\nA task has just been assigned to you.\n\n");
        let _ = writeln!(body, "Title       : {}", task.title);
        let _ = writeln!(
            body,
            "Project     : {}",
            self.project.map_or("-", |project| project.name.as_str())
        );
        let _ = writeln!(body, "Status      : {}", task.status);
        let _ = writeln!(body, "Priority    : {}", task.priority);
        if let Some(deadline) = task.deadline {
            let _ = writeln!(body, "Deadline    : {}", deadline.format("%Y-%m-%d"));
        }
        if let Some(end_date) = task.end_date {
            let _ = writeln!(body, "End date    : {}", end_date.format("%Y-%m-%d"));
        }
        let _ = writeln!(body, "Assigned by : {actor}");
        let _ = write!(body, "\nDetails: {}\n\n--\nPMT", self.deep_link(frontend_base));
        body
    }

    /// Render into a message addressed to the assignee.
    #[must_use]
    pub fn compose(&self, from: &str, frontend_base: &str) -> MailMessage {
        MailMessage {
            from: from.to_string(),
            to: self.assignee.email.trim().to_string(),
            subject: self.subject(),
            body: self.body(frontend_base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use pmt_core::enums::{TaskPriority, TaskStatus};
    use pretty_assertions::assert_eq;

    fn user() -> User {
        User {
            id: "usr-1".into(),
            email: "bob@example.com".into(),
            username: Some("bob".into()),
            created_at: Utc::now(),
        }
    }

    fn task() -> Task {
        Task {
            id: "tsk-1".into(),
            project_id: "prj-1".into(),
            title: "Fix bug".into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            deadline: NaiveDate::from_ymd_opt(2026, 3, 1),
            end_date: None,
            assignee_id: Some("usr-1".into()),
            created_at: Utc::now(),
        }
    }

    fn project() -> Project {
        Project {
            id: "prj-1".into(),
            name: "Website".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn deep_link_joins_base_and_ids() {
        let (assignee, task) = (user(), task());
        let notice = AssignmentNotice {
            assignee: &assignee,
            task: &task,
            project: None,
            actor_display: None,
        };
        assert_eq!(
            notice.deep_link("http://localhost:4200/"),
            "http://localhost:4200/projects/prj-1/tasks/tsk-1"
        );
    }

    #[test]
    fn body_lists_fields_and_actor() {
        let (assignee, task, project) = (user(), task(), project());
        let notice = AssignmentNotice {
            assignee: &assignee,
            task: &task,
            project: Some(&project),
            actor_display: Some("ada"),
        };
        let message = notice.compose("no-reply@localhost", "http://localhost:4200");
        assert_eq!(message.to, "bob@example.com");
        assert_eq!(message.subject, "[PMT] New task assigned: Fix bug");
        assert_eq!(
            message.body,
            "Hello,\n\nA task has just been assigned to you.\n\n\
             Title       : Fix bug\n\
             Project     : Website\n\
             Status      : TODO\n\
             Priority    : HIGH\n\
             Deadline    : 2026-03-01\n\
             Assigned by : ada\n\
             \nDetails: http://localhost:4200/projects/prj-1/tasks/tsk-1\n\n--\nPMT"
        );
    }

    #[test]
    fn unknown_actor_defaults_to_system() {
        let (assignee, task) = (user(), task());
        let notice = AssignmentNotice {
            assignee: &assignee,
            task: &task,
            project: None,
            actor_display: Some("  "),
        };
        let body = notice.body("http://localhost:4200");
        assert!(body.contains("Assigned by : System\n"));
        assert!(body.contains("Project     : -\n"));
    }
}
