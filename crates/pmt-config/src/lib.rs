//! # pmt-config
//!
//! Layered configuration loading for PMT using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PMT_*` prefix, `__` as separator)
//! 2. Project-level `.pmt/config.toml`
//! 3. User-level `~/.config/pmt/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PMT_NOTIFICATIONS__ENABLED` -> `notifications.enabled`,
//! `PMT_MAIL__RELAY_URL` -> `mail.relay_url`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use pmt_config::PmtConfig;
//!
//! let config = PmtConfig::load_with_dotenv().expect("config");
//!
//! if !config.notifications.enabled {
//!     println!("assignment mails are switched off");
//! }
//! ```

mod database;
mod error;
mod mail;
mod notifications;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use mail::MailConfig;
pub use notifications::NotificationsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = ".pmt/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PmtConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

impl PmtConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.notifications.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and callers can add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("PMT_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pmt").join("config.toml"))
    }

    /// Load `.env` from the current directory, if present.
    fn load_dotenv() {
        let _ = dotenvy::dotenv();
    }
}
