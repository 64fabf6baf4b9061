//! Delivery error types.

use thiserror::Error;

/// Errors raised by a [`crate::Mailer`]. Never surfaced past the dispatcher.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The transport could not reach the delivery endpoint.
    #[error("Transport failed: {0}")]
    Transport(String),

    /// The endpoint answered but refused the message.
    #[error("Rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The mailer is not usable (misconfigured, or failing on purpose in tests).
    #[error("Mailer unavailable: {0}")]
    Unavailable(String),
}
