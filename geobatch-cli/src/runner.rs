//! CLI runner for common setup.
//!
//! Loads the configuration file and initializes logging once, so each
//! command handler starts from the same state.

use std::path::Path;

use geobatch::config::ConfigFile;
use geobatch::logging::{init_logging, LoggingGuard};
use tracing::{debug, info};

use crate::error::CliError;

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps the log file writer alive while the runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Loads `config_path` (or the default config file) and starts logging.
    pub fn new(verbose: bool, config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(verbose, config.logging.file.as_deref())
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        if let Some(path) = config_path {
            debug!(path = %path.display(), "Using config file");
        }

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("geobatch v{}", geobatch::VERSION);
        info!("geobatch CLI: {} command", command);
    }
}
