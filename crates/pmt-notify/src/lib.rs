//! # pmt-notify
//!
//! Best-effort notification of task assignees.
//!
//! The [`NotificationDispatcher`] composes an [`AssignmentNotice`] and hands
//! it to a [`Mailer`]. Delivery failures are logged and discarded: nothing in
//! this crate returns an error to the code that triggered the notification.
//!
//! Three dispatch modes:
//! - `disabled` logs what would have been sent
//! - `inline` delivers before `notify_assignment` returns
//! - `spawn` queues the message for a background worker that retries with
//!   exponential backoff

pub mod dispatcher;
pub mod error;
pub mod mailer;
pub mod message;
pub mod relay;
pub mod retry;

pub use dispatcher::{Dispatch, NotificationDispatcher};
pub use error::DeliveryError;
pub use mailer::{LogMailer, Mailer, MemoryMailer};
pub use message::{AssignmentNotice, MailMessage};
pub use relay::HttpRelayMailer;
pub use retry::RetryPolicy;
