//! Application settings loading from ledger.toml and environment variables.
//!
//! Settings are read once at process start and passed into the components
//! that need them; nothing in the core reads the environment at call time.
//! A missing `ledger.toml` falls back to defaults, and `DATABASE_URL` /
//! `LEDGER_DELETE_SECRET` environment variables override the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default exchange rate applied when a transaction carries no snapshot.
const DEFAULT_EXCHANGE_RATE: f64 = 40.0;

/// Sweep policy settings controlling the overdue reminder batch job.
#[derive(Debug, Deserialize, Clone)]
pub struct SweepSettings {
    /// Age in days past which an open account is considered overdue
    #[serde(default = "default_overdue_after_days")]
    pub overdue_after_days: i64,
    /// Whether later sweeps re-send reminders to already-notified accounts.
    /// Defaults to true, the behavior observed in production.
    #[serde(default = "default_resend_every_run")]
    pub resend_every_run: bool,
    /// Optional cap on accounts processed per run
    #[serde(default)]
    pub max_accounts: Option<u64>,
}

const fn default_overdue_after_days() -> i64 {
    30
}

const fn default_resend_every_run() -> bool {
    true
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            overdue_after_days: default_overdue_after_days(),
            resend_every_run: default_resend_every_run(),
            max_accounts: None,
        }
    }
}

/// Top-level application configuration (ledger.toml)
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Database connection string
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Fallback rate for transactions without an exchange rate snapshot
    #[serde(default = "default_exchange_rate")]
    pub default_exchange_rate: f64,
    /// Shared secret required for destructive entry deletion
    #[serde(default)]
    pub delete_secret: Option<String>,
    /// Reminder sweep policy
    #[serde(default)]
    pub sweep: SweepSettings,
}

fn default_database_url() -> String {
    "sqlite://data/ledger.sqlite".to_string()
}

const fn default_exchange_rate() -> f64 {
    DEFAULT_EXCHANGE_RATE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            default_exchange_rate: DEFAULT_EXCHANGE_RATE,
            delete_secret: None,
            sweep: SweepSettings::default(),
        }
    }
}

/// Loads configuration from a TOML file, then applies environment overrides.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed. A
/// missing file is not an error: defaults apply.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let mut config = if path.as_ref().exists() {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
            message: format!("Failed to read config file: {e}"),
        })?;
        toml::from_str(&contents).map_err(|e| Error::Config {
            message: format!("Failed to parse ledger.toml: {e}"),
        })?
    } else {
        AppConfig::default()
    };

    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database_url = url;
    }
    if let Ok(secret) = std::env::var("LEDGER_DELETE_SECRET") {
        config.delete_secret = Some(secret);
    }

    Ok(config)
}

/// Loads configuration from the default location (./ledger.toml)
pub fn load_default_config() -> Result<AppConfig> {
    load_config("ledger.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            database_url = "sqlite://test.sqlite"
            default_exchange_rate = 36.5
            delete_secret = "hunter2"

            [sweep]
            overdue_after_days = 45
            resend_every_run = false
            max_accounts = 100
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database_url, "sqlite://test.sqlite");
        assert_eq!(config.default_exchange_rate, 36.5);
        assert_eq!(config.delete_secret.as_deref(), Some("hunter2"));
        assert_eq!(config.sweep.overdue_after_days, 45);
        assert!(!config.sweep.resend_every_run);
        assert_eq!(config.sweep.max_accounts, Some(100));
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.default_exchange_rate, 40.0);
        assert!(config.delete_secret.is_none());
        assert_eq!(config.sweep.overdue_after_days, 30);
        assert!(config.sweep.resend_every_run);
        assert_eq!(config.sweep.max_accounts, None);
    }

    #[test]
    fn test_load_config_missing_file_defaults() {
        let config = load_config("definitely-not-here.toml").unwrap();
        assert_eq!(config.default_exchange_rate, 40.0);
    }
}
