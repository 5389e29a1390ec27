//! services/cms/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error("Could not load the credential file {0}: {1}")]
    CredentialFile(String, String),
    #[error("Could not prepare the data directory {0}: {1}")]
    DataDir(String, String),
}

/// Selects which set of default paths is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    /// Keeps test fixtures away from real documents and users.
    Test,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub environment: Environment,
    pub data_dir: PathBuf,
    pub users_file: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test builds to keep tests hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:4567".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let environment = match var("CMS_ENV").as_deref() {
            Some("test") => Environment::Test,
            Some("development") | Some("") | None => Environment::Development,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "CMS_ENV".to_string(),
                    format!("'{}' is neither 'development' nor 'test'", other),
                ))
            }
        };

        let (default_data_dir, default_users_file) = match environment {
            Environment::Development => ("./data", "./users.yml"),
            Environment::Test => ("./test/data", "./test/users.yml"),
        };

        let data_dir = var("CMS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(default_data_dir));
        let users_file = var("CMS_USERS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(default_users_file));

        Ok(Self {
            bind_address,
            log_level,
            environment,
            data_dir,
            users_file,
        })
    }
}
