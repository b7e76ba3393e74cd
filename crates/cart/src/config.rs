//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CARTWHEEL_DATA_DIR` - Directory for persisted cart state (default: .cartwheel)
//! - `CARTWHEEL_FOLLOW_UP_DELAY_MS` - Delay before follow-up notices (default: 2000)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".cartwheel";
const DEFAULT_FOLLOW_UP_DELAY_MS: &str = "2000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory holding one JSON document per persisted key
    pub data_dir: PathBuf,
    /// Delay before follow-up notices are delivered
    pub follow_up_delay: Duration,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            follow_up_delay: crate::store::DEFAULT_FOLLOW_UP_DELAY,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let data_dir = PathBuf::from(get_or_default("CARTWHEEL_DATA_DIR", DEFAULT_DATA_DIR));
        if data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CARTWHEEL_DATA_DIR".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let follow_up_delay_ms = get_or_default(
            "CARTWHEEL_FOLLOW_UP_DELAY_MS",
            DEFAULT_FOLLOW_UP_DELAY_MS,
        )
        .trim()
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("CARTWHEEL_FOLLOW_UP_DELAY_MS".to_string(), e.to_string())
        })?;

        Ok(Self {
            data_dir,
            follow_up_delay: Duration::from_millis(follow_up_delay_ms),
        })
    }
}
