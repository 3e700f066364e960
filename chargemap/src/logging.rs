//! Tracing subscriber setup.
//!
//! Log lines carry local RFC 3339 timestamps. `RUST_LOG`, when set, overrides
//! the configured filter. With a log file configured, output goes through a
//! non-blocking writer whose guard must be held until shutdown.

use std::path::PathBuf;

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Filter used when nothing else is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors from installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file's directory could not be created.
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log file path has no file name.
    #[error("Invalid log file path: {0}")]
    InvalidPath(PathBuf),

    /// A global subscriber is already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingOptions {
    /// `EnvFilter` directive, e.g. `info` or `chargemap::cluster=debug`.
    pub level: String,
    /// Append to this file instead of writing to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl LoggingOptions {
    /// Raise the filter to `debug` (used by `--verbose`).
    pub fn verbose(mut self) -> Self {
        self.level = "debug".to_string();
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Keeps the background log writer alive.
///
/// Dropping it flushes any buffered lines.
#[derive(Debug)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global tracing subscriber.
pub fn init_logging(options: &LoggingOptions) -> Result<LoggingGuard, LoggingError> {
    let filter = options.env_filter();
    let timer = LocalTime::new(Rfc3339);

    match &options.file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| LoggingError::InvalidPath(path.clone()))?;
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            std::fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
                path: dir.clone(),
                source,
            })?;

            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))?;

            Ok(LoggingGuard { _file: Some(guard) })
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))?;

            Ok(LoggingGuard { _file: None })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LoggingOptions::default();
        assert_eq!(options.level, "info");
        assert!(options.file.is_none());
        assert_eq!(options.verbose().level, "debug");
    }

    #[test]
    fn test_init_with_file_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let options = LoggingOptions {
            level: "debug".to_string(),
            file: Some(log_dir.join("chargemap.log")),
        };

        let guard = init_logging(&options).unwrap();
        tracing::info!("logging initialised");
        drop(guard);

        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        let options = LoggingOptions {
            level: "info".to_string(),
            file: Some(PathBuf::from("/")),
        };
        assert!(matches!(
            init_logging(&options),
            Err(LoggingError::InvalidPath(_))
        ));
    }
}
