//! Assignment notification settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_enabled() -> bool {
    true
}

fn default_frontend_url() -> String {
    String::from("http://localhost:4200")
}

fn default_from() -> String {
    String::from("no-reply@localhost")
}

const fn default_queue_capacity() -> usize {
    64
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    200
}

const fn default_max_delay_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationsConfig {
    /// Master switch. When off, notifications are logged but never sent.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Base URL for deep links in messages.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Sender address.
    #[serde(default = "default_from")]
    pub from: String,

    /// Pending messages held by the delivery worker before new ones are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Delivery attempts per message, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound on the backoff delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            frontend_url: default_frontend_url(),
            from: default_from(),
            queue_capacity: default_queue_capacity(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl NotificationsConfig {
    /// Frontend URL without trailing slashes.
    pub fn frontend_base(&self) -> &str {
        self.frontend_url.trim_end_matches('/')
    }

    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Reject values the delivery worker cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notifications.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notifications.queue_capacity".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "notifications.base_delay_ms".into(),
                reason: format!("exceeds max_delay_ms ({})", self.max_delay_ms),
            });
        }
        Ok(())
    }
}
