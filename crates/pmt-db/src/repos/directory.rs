//! The store as the mutator's user directory.

use async_trait::async_trait;

use pmt_core::entities::User;
use pmt_core::errors::CoreError;
use pmt_core::mutator::UserDirectory;

use crate::service::PmtService;

#[async_trait]
impl UserDirectory for PmtService {
    async fn user_by_id(&self, id: &str) -> Result<Option<User>, CoreError> {
        self.find_user(id)
            .await
            .map_err(|e| CoreError::Other(e.into()))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        self.find_user_by_email(email)
            .await
            .map_err(|e| CoreError::Other(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn resolves_by_id_and_address() {
        let svc = test_service().await;
        let ada = svc.create_user("ada@example.com", None).await.unwrap();
        let dir: &dyn UserDirectory = &svc;

        assert_eq!(dir.user_by_id(&ada.id).await.unwrap().map(|u| u.id), Some(ada.id.clone()));
        assert_eq!(
            dir.user_by_email("ADA@example.com").await.unwrap().map(|u| u.id),
            Some(ada.id)
        );
        assert!(dir.user_by_id("usr-nobody").await.unwrap().is_none());
    }
}
