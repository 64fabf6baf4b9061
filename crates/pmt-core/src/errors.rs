//! Cross-cutting error types for PMT.
//!
//! Store-specific errors (`DatabaseError`) and the orchestrator taxonomy
//! (`MutationError`) live in `pmt-db`. `CoreError` covers what the pure
//! mutation path can raise on its own.

use thiserror::Error;

/// Errors that can be raised by the pure mutation path.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// An assignee reference did not resolve to a known user.
    #[error("{field} not found: {value}")]
    AssigneeNotFound { field: &'static str, value: String },

    /// Data failed validation (length, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors, including lookup failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
