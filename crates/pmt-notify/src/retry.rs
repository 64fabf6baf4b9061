//! Retry with exponential backoff for message delivery.
//!
//! Every [`DeliveryError`] is treated as transient: the worker keeps trying
//! until `max_attempts` is reached, then logs and drops the message.

use std::time::Duration;

use pmt_config::NotificationsConfig;

use crate::error::DeliveryError;
use crate::mailer::Mailer;
use crate::message::MailMessage;

/// Configuration for retry behavior on failed deliveries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    #[must_use]
    pub const fn once() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn from_config(config: &NotificationsConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay(),
            max_delay: config.max_delay(),
        }
    }

    /// Delay before retry number `retry` (1-based): `base * 2^(retry-1)`, capped.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Deliver `message`, retrying on failure.
///
/// Returns the number of attempts used on success.
///
/// # Errors
///
/// Returns the last `DeliveryError` once every attempt has failed.
pub async fn deliver_with_retry(
    mailer: &dyn Mailer,
    message: &MailMessage,
    policy: &RetryPolicy,
) -> Result<u32, DeliveryError> {
    let mut attempt = 1;
    loop {
        match mailer.send(message).await {
            Ok(()) => return Ok(attempt),
            Err(error) if attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    to = %message.to,
                    attempt,
                    %error,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "mail delivery failed; retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
