//! Error types for lansweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Probe failures never
//! leave the scanner; only input, configuration and lookup errors are
//! surfaced to callers.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::PrefixError;

/// Why a single TCP connect attempt did not establish a connection.
///
/// Only used for trace logging inside the prober. Every variant means
/// "not open" to the rest of the crate.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("connection timed out")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("host unreachable")]
    HostUnreachable,

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("connection to port {port} failed: {reason}")]
    ConnectionFailed { port: u16, reason: String },
}

/// Error raised while reading or parsing the scan target.
#[derive(Error, Debug)]
pub enum InputError {
    #[error(transparent)]
    Prefix(#[from] PrefixError),

    #[error("invalid host address '{0}'")]
    Address(String),

    #[error("no input given")]
    Empty,

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised by a vulnerability, OS or application resolver.
#[derive(Error, Debug, Clone)]
pub enum LookupError {
    #[error("{category} lookup for {identifier} failed: {reason}")]
    Failed {
        category: &'static str,
        identifier: String,
        reason: String,
    },

    #[error("{0} lookup backend unavailable")]
    Unavailable(&'static str),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("invalid setting {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Top-level error type for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Input(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for lookups.
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for the CLI.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_exit_code() {
        let err = CliError::from(InputError::Empty);
        assert_eq!(err.exit_code(), 2);

        let err = CliError::from(ConfigError::DirectoryNotFound);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_output_failure_is_io_error() {
        let broken = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err = CliError::from(broken);
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "IO error: stdout closed");
    }

    #[test]
    fn test_lookup_error_display() {
        let err = LookupError::Failed {
            category: "Port",
            identifier: "22".to_string(),
            reason: "feed offline".to_string(),
        };
        assert_eq!(err.to_string(), "Port lookup for 22 failed: feed offline");
    }
}
