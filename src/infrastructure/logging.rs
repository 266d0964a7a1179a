//! Logging initialization.
//!
//! The terminal UI owns stdout, so events are written to the configured log
//! file instead.

use crate::infrastructure::{ConfigError, LoggingConfig};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

impl LoggingConfig {
    /// Installs the global tracing subscriber, appending to `self.file`.
    pub fn init(&self) -> Result<(), ConfigError> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| ConfigError::InvalidValue {
                field: "logging.level",
                reason: e.to_string(),
            })?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file)
            .map_err(|e| ConfigError::Logging(format!("{}: {}", self.file.display(), e)))?;

        fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init()
            .map_err(|e| ConfigError::Logging(e.to_string()))
    }
}
