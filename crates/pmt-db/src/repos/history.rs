//! Task history repository.
//!
//! Append-only: rows are inserted by the recorder and read back newest
//! first. The schema rejects UPDATE and DELETE on `task_history`.

use pmt_core::entities::TaskHistory;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime};
use crate::service::PmtService;

const SELECT_COLS: &str = "id, task_id, change_log, changed_by, changed_at";

fn row_to_history(row: &libsql::Row) -> Result<TaskHistory, DatabaseError> {
    Ok(TaskHistory {
        id: row.get(0)?,
        task_id: row.get(1)?,
        change_log: row.get(2)?,
        changed_by: get_opt_string(row, 3)?,
        changed_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

/// Append one history row.
pub(crate) async fn insert_history(
    conn: &libsql::Connection,
    entry: &TaskHistory,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!("INSERT INTO task_history ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
        libsql::params![
            entry.id.as_str(),
            entry.task_id.as_str(),
            entry.change_log.as_str(),
            entry.changed_by.as_deref(),
            format_datetime(&entry.changed_at)
        ],
    )
    .await?;
    Ok(())
}

impl PmtService {
    /// History of a task, newest first. Ties on the timestamp are broken by
    /// id, descending.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list_history_for_task(
        &self,
        task_id: &str,
    ) -> Result<Vec<TaskHistory>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM task_history WHERE task_id = ?1
                     ORDER BY changed_at DESC, id DESC"
                ),
                [task_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_history(&row)?);
        }
        Ok(results)
    }
}
