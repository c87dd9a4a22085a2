//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Merge delay string could not be parsed as milliseconds.
    #[error("failed to parse merge delay '{value}': {source}")]
    DelayParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
