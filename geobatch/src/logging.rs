//! Logging setup.
//!
//! Human-readable output on stderr (so it interleaves with the progress bar
//! and keeps stdout free), plus an optional plain-text log file written
//! through a non-blocking appender. `RUST_LOG` overrides the default level.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Initializes the global subscriber.
///
/// When `log_file` is set its parent directory is created and the file is
/// truncated before logging starts.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<LoggingGuard, io::Error> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, file_guard) = match log_file {
        Some(path) => {
            let (dir, name) = split_log_path(path)?;
            fs::create_dir_all(dir)?;
            fs::write(path, "")?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::other(format!("Failed to initialize logging: {}", e)))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn split_log_path(path: &Path) -> Result<(&Path, &std::ffi::OsStr), io::Error> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Log path has no file name: {}", path.display()),
        )
    })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("/var/log/geobatch.log")).unwrap();
        assert_eq!(dir, Path::new("/var/log"));
        assert_eq!(name, "geobatch.log");

        let (dir, name) = split_log_path(Path::new("geobatch.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "geobatch.log");
    }

    #[test]
    fn test_split_log_path_without_file_name() {
        assert!(split_log_path(Path::new("/")).is_err());
    }
}
