//! Error types for pmt-db.
//!
//! [`DatabaseError`] is what the store raises. [`MutationError`] is the
//! taxonomy the orchestrated operations report to their callers.

use pmt_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether the store rejected the write because of a constraint
    /// (unique, foreign key, check, not null).
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        self.to_string().contains("constraint failed")
    }
}

/// Terminal failures of an orchestrated operation.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The task or project does not exist, or the task belongs to another
    /// project.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An assignee reference did not resolve to a user.
    #[error("Invalid assignee: {0}")]
    InvalidAssignee(String),

    /// The store rejected the write. Carries the store's message.
    #[error("Persistence conflict: {0}")]
    PersistenceConflict(String),

    /// Anything else.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl MutationError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// HTTP-equivalent status: 404 for lookups that missed, 400 otherwise.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidInput(_)
            | Self::InvalidAssignee(_)
            | Self::PersistenceConflict(_)
            | Self::Unexpected(_) => 400,
        }
    }
}

impl From<DatabaseError> for MutationError {
    fn from(error: DatabaseError) -> Self {
        if error.is_constraint_violation() {
            Self::PersistenceConflict(error.to_string())
        } else {
            Self::Unexpected(error.to_string())
        }
    }
}

impl From<libsql::Error> for MutationError {
    fn from(error: libsql::Error) -> Self {
        DatabaseError::from(error).into()
    }
}

impl From<CoreError> for MutationError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::NotFound { entity_type, id } => Self::Unexpected(format!(
                "dangling reference to {entity_type} {id}"
            )),
            CoreError::AssigneeNotFound { field, value } => {
                Self::InvalidAssignee(format!("{field} not found: {value}"))
            }
            CoreError::Validation(reason) => Self::InvalidInput(reason),
            CoreError::Other(inner) => match inner.downcast::<DatabaseError>() {
                Ok(db) => db.into(),
                Err(other) => Self::Unexpected(format!("{other:#}")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn constraint_messages_become_conflicts() {
        let db = DatabaseError::Query("UNIQUE constraint failed: users.email".into());
        assert!(matches!(
            MutationError::from(db),
            MutationError::PersistenceConflict(message) if message.contains("users.email")
        ));
    }

    #[test]
    fn other_db_errors_are_unexpected() {
        assert!(matches!(
            MutationError::from(DatabaseError::NoResult),
            MutationError::Unexpected(_)
        ));
    }

    #[test]
    fn assignee_miss_keeps_reason() {
        let core = CoreError::AssigneeNotFound {
            field: "assigneeId",
            value: "usr-nobody".into(),
        };
        let error = MutationError::from(core);
        assert_eq!(error.to_string(), "Invalid assignee: assigneeId not found: usr-nobody");
        assert_eq!(error.status_code(), 400);
    }

    #[test]
    fn validation_is_invalid_input() {
        let error = MutationError::from(CoreError::Validation("title too short".into()));
        assert!(matches!(
            error,
            MutationError::InvalidInput(reason) if reason == "title too short"
        ));
    }

    #[test]
    fn wrapped_db_error_is_classified() {
        let inner = DatabaseError::Query("FOREIGN KEY constraint failed".into());
        let core = CoreError::Other(anyhow::Error::new(inner));
        assert!(matches!(
            MutationError::from(core),
            MutationError::PersistenceConflict(_)
        ));
    }

    #[test]
    fn not_found_is_404() {
        let error = MutationError::not_found("task", "tsk-1");
        assert_eq!(error.to_string(), "task not found: tsk-1");
        assert_eq!(error.status_code(), 404);
    }
}
