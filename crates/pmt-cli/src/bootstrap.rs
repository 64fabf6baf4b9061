use std::path::Path;

use anyhow::Context;
use pmt_config::PmtConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, apply CLI overrides, and make sure the
/// database directory exists.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<PmtConfig> {
    load_dotenv()?;

    let mut config = PmtConfig::load().context("failed to load pmt configuration")?;
    apply_overrides(&mut config, flags);
    ensure_db_dir(&config)?;
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    let env_path = std::env::current_dir()
        .context("failed to determine current directory")?
        .join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

fn apply_overrides(config: &mut PmtConfig, flags: &GlobalFlags) {
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
    }
}

fn ensure_db_dir(config: &PmtConfig) -> anyhow::Result<()> {
    if config.database.is_in_memory() {
        return Ok(());
    }
    let Some(parent) = Path::new(&config.database.path).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create database directory {}", parent.display()))
}
