//! Configuration management for medbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::schema::{APPOINTMENTS_FILE_NAME, DOCTORS_FILE_NAME};
use crate::storage::StoreLocation;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "medbook";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "MEDBOOK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `MEDBOOK_`, nested with `__`)
/// 2. TOML config file at `~/.config/medbook/config.toml`
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
    /// Directory holding the data files.
    /// Defaults to `~/.local/share/medbook`
    pub data_dir: Option<PathBuf>,
    /// Doctors file. Relative paths resolve against `data_dir`.
    pub doctors_file: PathBuf,
    /// Appointments file. Relative paths resolve against `data_dir`.
    pub appointments_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            doctors_file: PathBuf::from(DOCTORS_FILE_NAME),
            appointments_file: PathBuf::from(APPOINTMENTS_FILE_NAME),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
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
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.doctors_file.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "doctors_file must not be empty".to_string(),
            });
        }

        if self.storage.appointments_file.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "appointments_file must not be empty".to_string(),
            });
        }

        let location = self.store_location();
        if location.doctors == location.appointments {
            return Err(Error::ConfigValidation {
                message: format!(
                    "doctors and appointments must be different files (both {})",
                    location.doctors.display()
                ),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Resolve the data file paths for the record store.
    #[must_use]
    pub fn store_location(&self) -> StoreLocation {
        let data_dir = self.data_dir();
        StoreLocation {
            doctors: data_dir.join(&self.storage.doctors_file),
            appointments: data_dir.join(&self.storage.appointments_file),
        }
    }
}
