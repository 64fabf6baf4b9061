//! Shared test utilities for pmt-db unit tests.

pub(crate) mod helpers {
    use pmt_config::NotificationsConfig;
    use pmt_core::entities::Project;
    use pmt_notify::NotificationDispatcher;

    use crate::PmtDb;
    use crate::service::PmtService;

    /// Create an in-memory `PmtService` with notifications disabled.
    pub async fn test_service() -> PmtService {
        let db = PmtDb::open_local(":memory:").await.unwrap();
        PmtService::from_db(db, NotificationDispatcher::disabled(&NotificationsConfig::default()))
    }

    /// Create a project to hang tasks off.
    pub async fn test_project(svc: &PmtService) -> Project {
        svc.create_project("Website").await.unwrap()
    }
}
