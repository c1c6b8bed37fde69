//! Configuration management for logbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::{StoreOptions, DEFAULT_BUCKET, DEFAULT_DATABASE_PATH, DEFAULT_FILE_MODE};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "logbook";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "LOGBOOK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `LOGBOOK_`, `__` between sections)
/// 2. TOML config file at `~/.config/logbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Permission bits for a newly created database file.
    pub file_mode: u32,
    /// How long to wait for the database lock, in milliseconds.
    pub lock_timeout_ms: u64,
    /// Bucket that holds logbook entries.
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            file_mode: DEFAULT_FILE_MODE,
            lock_timeout_ms: 1000,
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

impl Config {
    /// Load configuration, reading the file at `config_path` or the default
    /// config path when `None`.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.bucket.is_empty() {
            return Err(Error::ConfigValidation {
                message: "bucket must not be empty".to_string(),
            });
        }

        if self.storage.database_path.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "database_path must not be empty".to_string(),
            });
        }

        if self.storage.lock_timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "lock_timeout_ms must be greater than 0".to_string(),
            });
        }

        if self.storage.file_mode > 0o777 || self.storage.file_mode & 0o600 != 0o600 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "file_mode ({:o}) must be at most 777 and keep owner read/write",
                    self.storage.file_mode
                ),
            });
        }

        Ok(())
    }

    /// Get the lock timeout as a Duration.
    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.storage.lock_timeout_ms)
    }

    /// Build the options a [`crate::Store`] is constructed with.
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            path: self.storage.database_path.clone(),
            file_mode: self.storage.file_mode,
            timeout: self.lock_timeout(),
            bucket: self.storage.bucket.clone(),
        }
    }
}
