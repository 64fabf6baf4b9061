//! Delivery collaborators.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::DeliveryError;
use crate::message::MailMessage;

/// Hands a message to whatever actually delivers it.
///
/// Implementations may fail; the dispatcher absorbs every error.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError>;
}

/// Logs messages instead of sending them. Used when no relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError> {
        tracing::warn!(
            to = %message.to,
            subject = %message.subject,
            "no mail relay configured; message logged only"
        );
        Ok(())
    }
}

/// Keeps delivered messages in memory. Can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<MailMessage>>,
    failures_left: AtomicU32,
    attempts: AtomicU32,
}

impl MemoryMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails.
    #[must_use]
    pub fn failing() -> Self {
        Self::failing_times(u32::MAX)
    }

    /// A mailer that fails the first `times` sends, then succeeds.
    #[must_use]
    pub fn failing_times(times: u32) -> Self {
        Self {
            failures_left: AtomicU32::new(times),
            ..Self::default()
        }
    }

    /// Messages accepted so far.
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().await.clone()
    }

    /// Send calls so far, failed ones included.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                (left > 0).then(|| left.saturating_sub(1))
            })
            .is_ok();
        if failing {
            return Err(DeliveryError::Unavailable(format!(
                "memory mailer refused message to {}",
                message.to
            )));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> MailMessage {
        MailMessage {
            from: "no-reply@localhost".into(),
            to: "bob@example.com".into(),
            subject: "hello".into(),
            body: "body".into(),
        }
    }

    #[tokio::test]
    async fn memory_mailer_records() {
        let mailer = MemoryMailer::new();
        mailer.send(&message()).await.unwrap();
        assert_eq!(mailer.sent().await, vec![message()]);
        assert_eq!(mailer.attempts(), 1);
    }

    #[tokio::test]
    async fn failing_times_recovers() {
        let mailer = MemoryMailer::failing_times(2);
        assert!(mailer.send(&message()).await.is_err());
        assert!(mailer.send(&message()).await.is_err());
        assert!(mailer.send(&message()).await.is_ok());
        assert_eq!(mailer.attempts(), 3);
        assert_eq!(mailer.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn log_mailer_never_fails() {
        assert!(LogMailer.send(&message()).await.is_ok());
    }
}
