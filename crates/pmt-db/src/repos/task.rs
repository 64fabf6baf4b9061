//! Task repository: row mapping, reads, and the writes used inside the
//! orchestrator's transactions.
//!
//! Writes take a `&libsql::Connection` so they can run against either the
//! service connection or an open `libsql::Transaction` (which derefs to one).

use pmt_core::entities::Task;

use crate::error::DatabaseError;
use crate::helpers::{
    format_date, format_datetime, get_opt_string, parse_datetime, parse_enum,
    parse_optional_date,
};
use crate::service::PmtService;

const SELECT_COLS: &str = "id, project_id, title, description, status, priority, deadline, \
                           end_date, assignee_id, created_at";

fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: get_opt_string(row, 3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        priority: parse_enum(&row.get::<String>(5)?)?,
        deadline: parse_optional_date(get_opt_string(row, 6)?.as_deref())?,
        end_date: parse_optional_date(get_opt_string(row, 7)?.as_deref())?,
        assignee_id: get_opt_string(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

/// Insert a new task row.
pub(crate) async fn insert_task(
    conn: &libsql::Connection,
    task: &Task,
) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO tasks ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ),
        libsql::params![
            task.id.as_str(),
            task.project_id.as_str(),
            task.title.as_str(),
            task.description.as_deref(),
            task.status.as_str(),
            task.priority.as_str(),
            task.deadline.as_ref().map(format_date),
            task.end_date.as_ref().map(format_date),
            task.assignee_id.as_deref(),
            format_datetime(&task.created_at)
        ],
    )
    .await?;
    Ok(())
}

/// Overwrite the mutable columns of an existing task. `project_id` and
/// `created_at` are never written.
pub(crate) async fn save_task(conn: &libsql::Connection, task: &Task) -> Result<(), DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE tasks
             SET title = ?1, description = ?2, status = ?3, priority = ?4,
                 deadline = ?5, end_date = ?6, assignee_id = ?7
             WHERE id = ?8",
            libsql::params![
                task.title.as_str(),
                task.description.as_deref(),
                task.status.as_str(),
                task.priority.as_str(),
                task.deadline.as_ref().map(format_date),
                task.end_date.as_ref().map(format_date),
                task.assignee_id.as_deref(),
                task.id.as_str()
            ],
        )
        .await?;
    if changed == 0 {
        return Err(DatabaseError::InvalidState(format!(
            "task {} vanished before it could be saved",
            task.id
        )));
    }
    Ok(())
}

impl PmtService {
    /// Load a task by id, regardless of project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row is malformed.
    pub async fn find_task(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1"), [id])
            .await?;
        rows.next().await?.map(|row| row_to_task(&row)).transpose()
    }

    /// Tasks of a project, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn list_project_tasks(&self, project_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM tasks WHERE project_id = ?1
                     ORDER BY created_at DESC, id DESC"
                ),
                [project_id],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_task(&row)?);
        }
        Ok(results)
    }
}
