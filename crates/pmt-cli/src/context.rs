use anyhow::Context;
use pmt_config::PmtConfig;
use pmt_db::service::PmtService;
use pmt_notify::NotificationDispatcher;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: PmtService,
}

impl AppContext {
    /// Open the database and start the notification dispatcher.
    pub async fn init(config: &PmtConfig) -> anyhow::Result<Self> {
        note_unconfigured(config);

        let notifier = NotificationDispatcher::from_config(config)
            .context("failed to initialize notification dispatcher")?;
        let service = PmtService::new_local(&config.database.path, notifier)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;

        Ok(Self { service })
    }

    /// Flush pending notifications before the process exits.
    pub async fn shutdown(self) {
        self.service.shutdown().await;
    }
}

/// Note when notifications are on but no relay is configured.
fn note_unconfigured(config: &PmtConfig) {
    if config.notifications.enabled && !config.mail.is_configured() {
        tracing::info!("mail relay not configured; assignment notices are only logged");
    }
}
