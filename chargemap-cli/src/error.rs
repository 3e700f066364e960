//! CLI error type.

use std::fmt;
use std::path::PathBuf;

use chargemap::config::ConfigError;
use chargemap::logging::LoggingError;
use chargemap::station::FeedError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration problem (bad key, bad value, unreadable file).
    Config(ConfigError),

    /// Station data could not be read or parsed.
    Feed(FeedError),

    /// Logging could not be initialised.
    Logging(LoggingError),

    /// Failed to read an input file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid combination of arguments.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Feed(e) => write!(f, "Station data error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            CliError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Feed(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Io { source, .. } => Some(source),
            CliError::Usage(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<FeedError> for CliError {
    fn from(e: FeedError) -> Self {
        CliError::Feed(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}
