//! Service layer: the store plus the notification dispatcher.
//!
//! `PmtService` wraps `PmtDb` (raw database access) and a
//! `NotificationDispatcher`. Repo methods live in `repos/`, the
//! orchestrated task operations in `orchestrator`, all as `impl PmtService`
//! blocks.

use pmt_notify::NotificationDispatcher;

use crate::PmtDb;
use crate::error::DatabaseError;

/// Orchestrates task mutations with history and notification.
///
/// Every effective mutation follows this protocol:
/// 1. Load the current task and resolve references
/// 2. Apply the update in memory and diff it
/// 3. Begin transaction; save the task; append one history row; commit
/// 4. Hand the assignment notice to the dispatcher (never fails the request)
pub struct PmtService {
    db: PmtDb,
    notifier: NotificationDispatcher,
}

impl PmtService {
    /// Create a new service over a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `notifier` - Where assignment notices go.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(
        db_path: &str,
        notifier: NotificationDispatcher,
    ) -> Result<Self, DatabaseError> {
        let db = PmtDb::open_local(db_path).await?;
        Ok(Self { db, notifier })
    }

    /// Create from an existing `PmtDb` (for testing).
    #[must_use]
    pub const fn from_db(db: PmtDb, notifier: NotificationDispatcher) -> Self {
        Self { db, notifier }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &PmtDb {
        &self.db
    }

    /// Access the notification dispatcher.
    #[must_use]
    pub const fn notifier(&self) -> &NotificationDispatcher {
        &self.notifier
    }

    /// Close the notification queue and wait for pending deliveries.
    pub async fn shutdown(self) {
        self.notifier.shutdown().await;
    }
}
