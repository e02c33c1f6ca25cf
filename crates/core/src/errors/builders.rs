//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a JSON error that keeps a caller-supplied description
    #[must_use]
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Json {
            message: message.into(),
            source,
        }
    }

    /// Create a report error
    #[must_use]
    pub fn report(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Report {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an experiment tracking error
    #[must_use]
    pub fn experiment(experiment_id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Experiment {
            experiment_id: experiment_id.into(),
            message: message.into(),
        }
    }
}
