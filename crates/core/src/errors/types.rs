//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for pipewatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for pipewatch operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("{operation} failed for '{}': {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A persisted pipeline report could not be used
    #[error("invalid pipeline report '{}': {message}", .path.display())]
    Report { path: PathBuf, message: String },

    /// Experiment tracking errors
    #[error("experiment '{experiment_id}' error: {message}")]
    Experiment {
        experiment_id: String,
        message: String,
    },
}
