//! Startup configuration and core bootstrap.
//!
//! # Responsibility
//! - Describe where the store lives and how logging behaves.
//! - Validate those settings before any side effect.
//! - Open the store (and optionally logging) from one value.

use crate::db::{open_db, DbError};
use crate::logging::{
    default_log_level, init_logging, LogOptions, LoggingError, DEFAULT_MAX_LOG_FILES,
    DEFAULT_MAX_LOG_FILE_BYTES,
};
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Core settings, usually deserialized from a host-provided document.
///
/// Only `db_path` is required; everything else falls back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    #[serde(default = "default_level_string")]
    pub log_level: String,
    /// Logging stays off when absent.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default = "default_max_file_bytes")]
    pub log_max_file_bytes: u64,
    #[serde(default = "default_max_files")]
    pub log_max_files: usize,
}

impl CoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            log_level: default_level_string(),
            log_dir: None,
            log_max_file_bytes: DEFAULT_MAX_LOG_FILE_BYTES,
            log_max_files: DEFAULT_MAX_LOG_FILES,
        }
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("db_path must not be empty".to_string()));
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        if self.log_max_file_bytes == 0 {
            return Err(ConfigError::Invalid(
                "log_max_file_bytes must be positive".to_string(),
            ));
        }
        if self.log_max_files == 0 {
            return Err(ConfigError::Invalid(
                "log_max_files must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Logging options, when a log directory is configured.
    pub fn log_options(&self) -> Option<LogOptions> {
        self.log_dir.as_ref().map(|dir| LogOptions {
            level: self.log_level.clone(),
            log_dir: dir.clone(),
            max_file_bytes: self.log_max_file_bytes,
            max_files: self.log_max_files,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(String),
    Logging(LoggingError),
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(message) => write!(f, "invalid core config: {message}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(_) => None,
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Validates `config`, starts logging if configured, then opens the store.
pub fn open_core(config: &CoreConfig) -> Result<Connection, ConfigError> {
    config.validate()?;
    if let Some(options) = config.log_options() {
        init_logging(&options)?;
    }
    let conn = open_db(&config.db_path)?;
    info!(
        "event=core_open module=config status=ok logging={}",
        config.log_dir.is_some()
    );
    Ok(conn)
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_LOG_FILE_BYTES
}

fn default_max_files() -> usize {
    DEFAULT_MAX_LOG_FILES
}
