//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and exit codes.

use std::fmt;
use std::process;

use geobatch::cog::CogError;
use geobatch::config::ConfigFileError;
use geobatch::convert::ConvertError;
use geobatch::coord::CoordError;
use geobatch::grid::GridError;
use geobatch::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid arguments or configuration, detected before any work starts
    Config(String),
    /// Invalid area selection
    Area(CoordError),
    /// Failed to set up the map provider
    Provider(ProviderError),
    /// Failed to write the output raster
    Write(CogError),
    /// A converter failed
    Convert(ConvertError),
}

impl CliError {
    /// Exit the process with an error message and status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Area(
                CoordError::MissingSelector
                | CoordError::ConflictingSelectors
                | CoordError::UnknownRegion(_),
            ) => {
                eprintln!();
                eprintln!("Use --region NAME or --bbox west,south,east,north (not both).");
                eprintln!(
                    "Known regions: {}",
                    geobatch::coord::region_names()
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            CliError::Write(CogError::FileTooLarge) => {
                eprintln!();
                eprintln!("The output exceeds the 4 GiB classic TIFF limit.");
                eprintln!("Try a smaller area, a coarser --resolution or a lower --max-pixels.");
            }
            CliError::Convert(ConvertError::MissingColumn(_)) => {
                eprintln!();
                eprintln!("Check the CSV header; column names are case-sensitive.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Area(e) => write!(f, "Configuration error: {}", e),
            CliError::Provider(e) => write!(f, "Failed to create map provider: {}", e),
            CliError::Write(e) => write!(f, "Failed to write output: {}", e),
            CliError::Convert(e) => write!(f, "Conversion failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Area(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Write(e) => Some(e),
            CliError::Convert(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Area(e)
    }
}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<CogError> for CliError {
    fn from(e: CogError) -> Self {
        CliError::Write(e)
    }
}

impl From<ConvertError> for CliError {
    fn from(e: ConvertError) -> Self {
        match e {
            ConvertError::NotFound(path) => {
                CliError::Config(format!("input file not found: {}", path.display()))
            }
            other => CliError::Convert(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_input_is_config_error() {
        let err = CliError::from(ConvertError::NotFound(PathBuf::from("in.csv")));
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: input file not found: in.csv"
        );
    }

    #[test]
    fn test_coord_error_display() {
        let err = CliError::from(CoordError::MissingSelector);
        assert_eq!(
            err.to_string(),
            "Configuration error: Must specify either a region or a bbox"
        );
    }

    #[test]
    fn test_write_error_has_source() {
        use std::error::Error;
        let err = CliError::from(CogError::FileTooLarge);
        assert!(err.source().is_some());
    }
}
