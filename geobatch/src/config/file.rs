//! Configuration file model and loading.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::cog::{DEFAULT_BLOCK_SIZE, DEFAULT_DEFLATE_LEVEL, DEFAULT_OVERVIEW_FACTORS};
use crate::guf::GUF_NODATA;
use crate::provider::{DEFAULT_TIMEOUT_SECS, DEFAULT_WMS_ENDPOINT};

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// `[wms]` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct WmsSettings {
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout: u64,
}

/// `[cache]` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Tile cache directory; `None` uses the platform cache directory
    pub directory: Option<PathBuf>,
}

/// `[output]` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub block_size: u32,
    pub deflate_level: u32,
    pub nodata: u8,
    pub overviews: Vec<u32>,
}

/// `[logging]` settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoggingSettings {
    /// Optional log file written in addition to stderr
    pub file: Option<PathBuf>,
}

/// Parsed contents of `config.ini`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub wms: WmsSettings,
    pub cache: CacheSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            wms: WmsSettings {
                endpoint: DEFAULT_WMS_ENDPOINT.to_string(),
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            cache: CacheSettings { directory: None },
            output: OutputSettings {
                block_size: DEFAULT_BLOCK_SIZE,
                deflate_level: DEFAULT_DEFLATE_LEVEL,
                nodata: GUF_NODATA,
                overviews: DEFAULT_OVERVIEW_FACTORS.to_vec(),
            },
            logging: LoggingSettings::default(),
        }
    }
}

impl ConfigFile {
    /// Loads from the default path (`~/.geobatch/config.ini`).
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Loads from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Parses configuration from INI text.
    pub fn from_ini_str(content: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(content).map_err(ini::Error::Parse)?;
        super::parser::parse_ini(&ini)
    }
}

/// Path to the config directory (`~/.geobatch`).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".geobatch")
}

/// Path to the config file (`~/.geobatch/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert_eq!(config.wms.endpoint, DEFAULT_WMS_ENDPOINT);
        assert_eq!(config.wms.timeout, 60);
        assert!(config.cache.directory.is_none());
        assert_eq!(config.output.block_size, 512);
        assert_eq!(config.output.deflate_level, 9);
        assert_eq!(config.output.nodata, 128);
        assert_eq!(config.output.overviews, vec![2, 4, 8, 16, 32]);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[wms]\ntimeout = 15\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.wms.timeout, 15);
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with(".geobatch/config.ini"));
    }
}
