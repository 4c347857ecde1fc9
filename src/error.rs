//! Error types shared across the crate.
//!
//! Only whole-operation failures are errors. Per-entry problems during an
//! organize run (collisions, failed moves) are recorded as outcomes in the
//! [`OrganizeReport`](crate::report::OrganizeReport) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an organize or undo operation.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target path does not exist or is not a directory.
    #[error("Directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// The target directory exists but its entries could not be listed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target directory could not be resolved to an absolute path.
    #[error("Failed to resolve directory {}: {source}", .path.display())]
    ResolveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the history file.
    #[error("Failed to write history file: {source}")]
    HistoryWriteFailed {
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the history file.
    #[error("Failed to read history file: {source}")]
    HistoryReadFailed {
        #[source]
        source: std::io::Error,
    },

    /// History file has invalid format.
    #[error("Invalid history file format: {reason}")]
    InvalidHistoryFormat { reason: String },

    /// There is no recorded run to undo.
    #[error("No previous organization found to undo in {}", .path.display())]
    NoHistory { path: PathBuf },
}

/// Result type for organize and undo operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Errors that can occur during configuration loading and filtering.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{0}': expected *.ext or dir/**")]
    InvalidGlobPattern(String),

    /// Invalid regex pattern provided with the actual error reason.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },

    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    Io(String),
}

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Organize(#[from] OrganizeError),

    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to render report as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
