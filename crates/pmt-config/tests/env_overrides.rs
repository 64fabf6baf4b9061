//! Environment variable mapping through the full provider chain.

use figment::Jail;
use pmt_config::{ConfigError, PmtConfig};

#[test]
fn nested_env_vars_map_to_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("PMT_MAIL__RELAY_URL", "https://relay.example.com/v1/send");
        jail.set_env("PMT_MAIL__API_KEY", "env-key");
        jail.set_env("PMT_NOTIFICATIONS__QUEUE_CAPACITY", "16");

        let config = PmtConfig::load().expect("config loads");
        assert!(config.mail.is_configured());
        assert_eq!(config.mail.api_key(), Some("env-key"));
        assert_eq!(config.notifications.queue_capacity, 16);
        Ok(())
    });
}

#[test]
fn env_switch_disables_notifications() {
    Jail::expect_with(|jail| {
        jail.set_env("PMT_NOTIFICATIONS__ENABLED", "false");

        let config = PmtConfig::load().expect("config loads");
        assert!(!config.notifications.enabled);
        Ok(())
    });
}

#[test]
fn dotenv_file_feeds_env_provider() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "PMT_DATABASE__PATH=from-dotenv.db\n")?;

        let config = PmtConfig::load_with_dotenv().expect("config loads");
        assert_eq!(config.database.path, "from-dotenv.db");
        Ok(())
    });
}

#[test]
fn inconsistent_backoff_fails_load() {
    Jail::expect_with(|jail| {
        jail.set_env("PMT_NOTIFICATIONS__BASE_DELAY_MS", "9000");
        jail.set_env("PMT_NOTIFICATIONS__MAX_DELAY_MS", "1000");

        let result = PmtConfig::load();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field, .. }) if field == "notifications.base_delay_ms"
        ));
        Ok(())
    });
}
