//! Queued delivery through the background worker.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use pmt_config::NotificationsConfig;
use pmt_core::entities::{Project, Task, User};
use pmt_core::enums::{TaskPriority, TaskStatus};
use pmt_notify::{Dispatch, MemoryMailer, NotificationDispatcher};
use pretty_assertions::assert_eq;

fn config() -> NotificationsConfig {
    NotificationsConfig {
        frontend_url: "https://pmt.example.com/".into(),
        from: "pmt@example.com".into(),
        base_delay_ms: 1,
        max_delay_ms: 4,
        ..NotificationsConfig::default()
    }
}

fn bob() -> User {
    User {
        id: "usr-bob".into(),
        email: "bob@example.com".into(),
        username: Some("bob".into()),
        created_at: Utc::now(),
    }
}

fn task() -> Task {
    Task {
        id: "tsk-42".into(),
        project_id: "prj-7".into(),
        title: "Ship release".into(),
        description: Some("cut the tag".into()),
        status: TaskStatus::InProgress,
        priority: TaskPriority::High,
        deadline: NaiveDate::from_ymd_opt(2026, 11, 2),
        end_date: NaiveDate::from_ymd_opt(2026, 11, 5),
        assignee_id: Some("usr-bob".into()),
        created_at: Utc::now(),
    }
}

fn project() -> Project {
    Project {
        id: "prj-7".into(),
        name: "Platform".into(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn queued_message_is_delivered_after_shutdown() {
    let mailer = Arc::new(MemoryMailer::new());
    let dispatcher = NotificationDispatcher::spawn(mailer.clone(), &config());
    let (bob, task, project) = (bob(), task(), project());

    let outcome = dispatcher
        .notify_assignment(Some(&bob), Some(&task), Some(&project), Some("ada"))
        .await;
    assert_eq!(outcome, Dispatch::Queued);

    dispatcher.shutdown().await;
    let sent = mailer.sent().await;
    assert_eq!(sent.len(), 1);
    let message = &sent[0];
    assert_eq!(message.from, "pmt@example.com");
    assert_eq!(message.to, "bob@example.com");
    assert_eq!(message.subject, "[PMT] New task assigned: Ship release");
    assert!(message.body.contains("Project     : Platform\n"));
    assert!(message.body.contains("Status      : IN_PROGRESS\n"));
    assert!(message.body.contains("Deadline    : 2026-11-02\n"));
    assert!(message.body.contains("End date    : 2026-11-05\n"));
    assert!(
        message
            .body
            .contains("Details: https://pmt.example.com/projects/prj-7/tasks/tsk-42")
    );
}

#[tokio::test]
async fn worker_retries_transient_failures() {
    let mailer = Arc::new(MemoryMailer::failing_times(2));
    let dispatcher = NotificationDispatcher::spawn(mailer.clone(), &config());
    let (bob, task) = (bob(), task());

    dispatcher
        .notify_assignment(Some(&bob), Some(&task), None, None)
        .await;
    dispatcher.shutdown().await;

    assert_eq!(mailer.attempts(), 3);
    assert_eq!(mailer.sent().await.len(), 1);
}

#[tokio::test]
async fn worker_survives_a_message_that_never_delivers() {
    let mailer = Arc::new(MemoryMailer::failing_times(3));
    let dispatcher = NotificationDispatcher::spawn(mailer.clone(), &config());
    let (bob, task) = (bob(), task());

    dispatcher
        .notify_assignment(Some(&bob), Some(&task), None, None)
        .await;
    dispatcher
        .notify_assignment(Some(&bob), Some(&task), None, None)
        .await;
    dispatcher.shutdown().await;

    // First message burns all three attempts; the second goes through.
    assert_eq!(mailer.attempts(), 4);
    assert_eq!(mailer.sent().await.len(), 1);
}
