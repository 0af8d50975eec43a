//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration failures. Each names the `SHORTLIST_*` setting at fault where
/// there is one.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `SHORTLIST_PORT` parsed but is 0.
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    /// A model directory was configured but does not exist.
    #[error("{name} does not exist: {path}")]
    PathNotFound { name: &'static str, path: PathBuf },

    #[error("{name} is not a directory: {path}")]
    NotADirectory { name: &'static str, path: PathBuf },
}
