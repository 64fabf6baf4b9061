//! User repository: just enough to assign tasks and credit changes.

use pmt_core::entities::User;
use pmt_core::ids::PREFIX_USER;

use crate::error::{DatabaseError, MutationError};
use crate::helpers::{format_datetime, get_opt_string, now, parse_datetime};
use crate::service::PmtService;

const SELECT_COLS: &str = "id, email, username, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        username: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl PmtService {
    /// Register a user. Addresses are unique, compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::InvalidInput` for a blank address and
    /// `MutationError::PersistenceConflict` when the address is taken.
    pub async fn create_user(
        &self,
        email: &str,
        username: Option<&str>,
    ) -> Result<User, MutationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(MutationError::InvalidInput("email must not be blank".into()));
        }
        let username = username.map(str::trim).filter(|name| !name.is_empty());

        let created_at = now();
        let id = self.db().generate_id(PREFIX_USER).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![id.as_str(), email, username, format_datetime(&created_at)],
            )
            .await?;

        tracing::debug!(user_id = %id, "user created");
        Ok(User {
            id,
            email: email.to_string(),
            username: username.map(String::from),
            created_at,
        })
    }

    /// # Errors
    ///
    /// Returns `MutationError::NotFound` when no user has this id.
    pub async fn get_user(&self, id: &str) -> Result<User, MutationError> {
        self.find_user(id)
            .await?
            .ok_or_else(|| MutationError::not_found("user", id))
    }

    /// Look a user up by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        rows.next().await?.map(|row| row_to_user(&row)).transpose()
    }

    /// Look a user up by address, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE email = ?1"),
                [email.trim()],
            )
            .await?;
        rows.next().await?.map(|row| row_to_user(&row)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::MutationError;
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_and_get() {
        let svc = test_service().await;
        let user = svc.create_user(" ada@example.com ", Some("ada")).await.unwrap();
        assert!(user.id.starts_with("usr-"));
        assert_eq!(user.email, "ada@example.com");

        let fetched = svc.get_user(&user.id).await.unwrap();
        assert_eq!(fetched.email, user.email);
        assert_eq!(fetched.username.as_deref(), Some("ada"));
    }

    #[tokio::test]
    async fn blank_username_is_stored_as_absent() {
        let svc = test_service().await;
        let user = svc.create_user("bob@example.com", Some("  ")).await.unwrap();
        assert_eq!(svc.get_user(&user.id).await.unwrap().username, None);
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let svc = test_service().await;
        let user = svc.create_user("Ada@Example.com", None).await.unwrap();
        let found = svc.find_user_by_email(" ada@example.COM ").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let svc = test_service().await;
        svc.create_user("ada@example.com", None).await.unwrap();
        let result = svc.create_user("ADA@example.com", None).await;
        assert!(
            matches!(result, Err(MutationError::PersistenceConflict(_))),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn blank_email_is_invalid() {
        let svc = test_service().await;
        assert!(matches!(
            svc.create_user("   ", None).await,
            Err(MutationError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let svc = test_service().await;
        assert!(matches!(
            svc.get_user("usr-00000000").await,
            Err(MutationError::NotFound { entity: "user", .. })
        ));
        assert_eq!(svc.find_user("usr-00000000").await.unwrap(), None);
    }
}
