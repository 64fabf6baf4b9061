//! Assignment notification dispatch.
//!
//! [`NotificationDispatcher::notify_assignment`] never fails. Every problem
//! (missing inputs, disabled switch, full queue, relay errors) ends up as a
//! log line and a [`Dispatch`] value the caller is free to ignore.

use std::fmt;
use std::sync::Arc;

use pmt_config::{NotificationsConfig, PmtConfig};
use pmt_core::entities::{Project, Task, User};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::error::DeliveryError;
use crate::mailer::{LogMailer, Mailer};
use crate::message::{AssignmentNotice, MailMessage};
use crate::relay::HttpRelayMailer;
use crate::retry::{RetryPolicy, deliver_with_retry};

/// What happened to a notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Assignee, address or task missing. Nothing composed.
    Skipped,
    /// Notifications are switched off. The message was logged only.
    Disabled,
    /// Handed to the background worker.
    Queued,
    /// Delivered before returning.
    Delivered,
    /// Delivery gave up after the last attempt.
    Failed,
    /// The worker queue was full or closed.
    Dropped,
}

enum Mode {
    Disabled,
    Inline {
        mailer: Arc<dyn Mailer>,
        retry: RetryPolicy,
    },
    Queued {
        sender: mpsc::Sender<MailMessage>,
        worker: JoinHandle<()>,
    },
}

/// Composes assignment messages and delivers them best-effort.
pub struct NotificationDispatcher {
    mode: Mode,
    from: String,
    frontend_base: String,
}

impl fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            Mode::Disabled => "disabled",
            Mode::Inline { .. } => "inline",
            Mode::Queued { .. } => "queued",
        };
        f.debug_struct("NotificationDispatcher")
            .field("mode", &mode)
            .field("from", &self.from)
            .field("frontend_base", &self.frontend_base)
            .finish()
    }
}

impl NotificationDispatcher {
    fn with_mode(mode: Mode, config: &NotificationsConfig) -> Self {
        Self {
            mode,
            from: config.from.clone(),
            frontend_base: config.frontend_base().to_string(),
        }
    }

    /// A dispatcher that only logs what it would send.
    #[must_use]
    pub fn disabled(config: &NotificationsConfig) -> Self {
        Self::with_mode(Mode::Disabled, config)
    }

    /// A dispatcher that delivers (with retries) before `notify_assignment`
    /// returns.
    #[must_use]
    pub fn inline(mailer: Arc<dyn Mailer>, config: &NotificationsConfig) -> Self {
        let retry = RetryPolicy::from_config(config);
        Self::with_mode(Mode::Inline { mailer, retry }, config)
    }

    /// A dispatcher backed by a worker task draining a bounded queue.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(mailer: Arc<dyn Mailer>, config: &NotificationsConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let retry = RetryPolicy::from_config(config);
        let worker = tokio::spawn(run_worker(receiver, mailer, retry));
        Self::with_mode(Mode::Queued { sender, worker }, config)
    }

    /// Build the dispatcher described by `config`: disabled when switched
    /// off, otherwise a queued worker over the HTTP relay (or the log mailer
    /// when no relay is configured).
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Unavailable` if the relay client cannot be built.
    pub fn from_config(config: &PmtConfig) -> Result<Self, DeliveryError> {
        let notifications = &config.notifications;
        if !notifications.enabled {
            return Ok(Self::disabled(notifications));
        }
        let mailer: Arc<dyn Mailer> = if config.mail.is_configured() {
            Arc::new(HttpRelayMailer::new(
                &config.mail.relay_url,
                config.mail.api_key(),
            )?)
        } else {
            Arc::new(LogMailer)
        };
        Ok(Self::spawn(mailer, notifications))
    }

    /// Notify `assignee` that `task` was assigned to them.
    ///
    /// `actor_display` names whoever made the change; `None` renders as the
    /// system actor.
    pub async fn notify_assignment(
        &self,
        assignee: Option<&User>,
        task: Option<&Task>,
        project: Option<&Project>,
        actor_display: Option<&str>,
    ) -> Dispatch {
        let (Some(assignee), Some(task)) = (assignee, task) else {
            tracing::debug!("assignment notification skipped: no assignee or task");
            return Dispatch::Skipped;
        };
        if !assignee.has_address() {
            tracing::debug!(user_id = %assignee.id, "assignment notification skipped: no address");
            return Dispatch::Skipped;
        }

        let notice = AssignmentNotice {
            assignee,
            task,
            project,
            actor_display,
        };
        let message = notice.compose(&self.from, &self.frontend_base);

        match &self.mode {
            Mode::Disabled => {
                tracing::info!(
                    to = %message.to,
                    subject = %message.subject,
                    "notifications disabled; message not sent"
                );
                Dispatch::Disabled
            }
            Mode::Inline { mailer, retry } => {
                match deliver_with_retry(mailer.as_ref(), &message, retry).await {
                    Ok(attempts) => {
                        tracing::info!(
                            to = %message.to,
                            task_id = %task.id,
                            attempts,
                            "assignment mail delivered"
                        );
                        Dispatch::Delivered
                    }
                    Err(error) => {
                        tracing::error!(
                            to = %message.to,
                            task_id = %task.id,
                            %error,
                            "assignment mail failed; giving up"
                        );
                        Dispatch::Failed
                    }
                }
            }
            Mode::Queued { sender, .. } => match sender.try_send(message) {
                Ok(()) => Dispatch::Queued,
                Err(TrySendError::Full(message)) => {
                    tracing::warn!(
                        to = %message.to,
                        task_id = %task.id,
                        "notification queue full; message dropped"
                    );
                    Dispatch::Dropped
                }
                Err(TrySendError::Closed(message)) => {
                    tracing::warn!(
                        to = %message.to,
                        task_id = %task.id,
                        "notification worker stopped; message dropped"
                    );
                    Dispatch::Dropped
                }
            },
        }
    }

    /// Stop accepting messages and wait for the worker to drain its queue.
    pub async fn shutdown(self) {
        if let Mode::Queued { sender, worker } = self.mode {
            drop(sender);
            if let Err(error) = worker.await {
                tracing::error!(%error, "notification worker ended abnormally");
            }
        }
    }
}

async fn run_worker(
    mut receiver: mpsc::Receiver<MailMessage>,
    mailer: Arc<dyn Mailer>,
    retry: RetryPolicy,
) {
    while let Some(message) = receiver.recv().await {
        match deliver_with_retry(mailer.as_ref(), &message, &retry).await {
            Ok(attempts) => {
                tracing::info!(to = %message.to, attempts, "assignment mail delivered");
            }
            Err(error) => {
                tracing::error!(to = %message.to, %error, "assignment mail failed; giving up");
            }
        }
    }
    tracing::debug!("notification worker drained");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MemoryMailer;
    use chrono::Utc;
    use pmt_core::enums::{TaskPriority, TaskStatus};
    use pretty_assertions::assert_eq;

    fn user(email: &str) -> User {
        User {
            id: "usr-1".into(),
            email: email.into(),
            username: None,
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
            deadline: None,
            end_date: None,
            assignee_id: Some("usr-1".into()),
            created_at: Utc::now(),
        }
    }

    fn config() -> NotificationsConfig {
        NotificationsConfig {
            base_delay_ms: 1,
            max_delay_ms: 2,
            ..NotificationsConfig::default()
        }
    }

    #[tokio::test]
    async fn missing_inputs_are_skipped() {
        let dispatcher = NotificationDispatcher::disabled(&config());
        let task = task();
        let bob = user("bob@example.com");
        assert_eq!(
            dispatcher.notify_assignment(None, Some(&task), None, None).await,
            Dispatch::Skipped
        );
        assert_eq!(
            dispatcher.notify_assignment(Some(&bob), None, None, None).await,
            Dispatch::Skipped
        );
        let nobody = user("  ");
        assert_eq!(
            dispatcher.notify_assignment(Some(&nobody), Some(&task), None, None).await,
            Dispatch::Skipped
        );
    }

    #[tokio::test]
    async fn disabled_sends_nothing() {
        let dispatcher = NotificationDispatcher::disabled(&config());
        let (bob, task) = (user("bob@example.com"), task());
        assert_eq!(
            dispatcher.notify_assignment(Some(&bob), Some(&task), None, None).await,
            Dispatch::Disabled
        );
    }

    #[tokio::test]
    async fn inline_delivers() {
        let mailer = Arc::new(MemoryMailer::new());
        let dispatcher = NotificationDispatcher::inline(mailer.clone(), &config());
        let (bob, task) = (user("bob@example.com"), task());
        let outcome = dispatcher
            .notify_assignment(Some(&bob), Some(&task), None, Some("ada"))
            .await;
        assert_eq!(outcome, Dispatch::Delivered);
        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "bob@example.com");
        assert!(sent[0].body.contains("Assigned by : ada"));
    }

    #[tokio::test]
    async fn inline_failure_is_absorbed() {
        let mailer = Arc::new(MemoryMailer::failing());
        let dispatcher = NotificationDispatcher::inline(mailer.clone(), &config());
        let (bob, task) = (user("bob@example.com"), task());
        let outcome = dispatcher
            .notify_assignment(Some(&bob), Some(&task), None, None)
            .await;
        assert_eq!(outcome, Dispatch::Failed);
        assert_eq!(mailer.attempts(), 3);
    }

    #[tokio::test]
    async fn full_queue_drops() {
        let cfg = NotificationsConfig {
            queue_capacity: 1,
            ..config()
        };
        let mailer = Arc::new(MemoryMailer::new());
        let dispatcher = NotificationDispatcher::spawn(mailer.clone(), &cfg);
        let (bob, task) = (user("bob@example.com"), task());
        // The worker cannot run until this task yields.
        let first = dispatcher.notify_assignment(Some(&bob), Some(&task), None, None).await;
        let second = dispatcher.notify_assignment(Some(&bob), Some(&task), None, None).await;
        assert_eq!(first, Dispatch::Queued);
        assert_eq!(second, Dispatch::Dropped);
        dispatcher.shutdown().await;
        assert_eq!(mailer.sent().await.len(), 1);
    }

    #[test]
    fn from_config_respects_switch() {
        let mut config = PmtConfig::default();
        config.notifications.enabled = false;
        let dispatcher = NotificationDispatcher::from_config(&config).unwrap();
        assert!(format!("{dispatcher:?}").contains("disabled"));
    }
}
