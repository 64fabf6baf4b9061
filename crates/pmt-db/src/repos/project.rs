//! Project repository: the owner of tasks.

use pmt_core::entities::Project;
use pmt_core::ids::PREFIX_PROJECT;

use crate::error::{DatabaseError, MutationError};
use crate::helpers::{format_datetime, now, parse_datetime};
use crate::service::PmtService;

const SELECT_COLS: &str = "id, name, created_at";

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

impl PmtService {
    /// # Errors
    ///
    /// Returns `MutationError::InvalidInput` for a blank name.
    pub async fn create_project(&self, name: &str) -> Result<Project, MutationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MutationError::InvalidInput("project name must not be blank".into()));
        }

        let created_at = now();
        let id = self.db().generate_id(PREFIX_PROJECT).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO projects ({SELECT_COLS}) VALUES (?1, ?2, ?3)"),
                libsql::params![id.as_str(), name, format_datetime(&created_at)],
            )
            .await?;

        tracing::debug!(project_id = %id, "project created");
        Ok(Project {
            id,
            name: name.to_string(),
            created_at,
        })
    }

    /// # Errors
    ///
    /// Returns `MutationError::NotFound` when no project has this id.
    pub async fn get_project(&self, id: &str) -> Result<Project, MutationError> {
        self.find_project(id)
            .await?
            .ok_or_else(|| MutationError::not_found("project", id))
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_project(&self, id: &str) -> Result<Option<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1"), [id])
            .await?;
        rows.next().await?.map(|row| row_to_project(&row)).transpose()
    }
}
