//! Extension traits for error handling

use super::types::{Error, Result};

/// Prefix errors with what the caller was doing, keeping their variant
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a lazy message
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().prefixed(context.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().prefixed(f()))
    }
}

impl Error {
    /// Same error with `context: ` in front of its description
    #[must_use]
    pub fn prefixed(self, context: String) -> Self {
        match self {
            Error::Configuration { message } => Error::Configuration {
                message: format!("{context}: {message}"),
            },
            Error::FileSystem {
                path,
                operation,
                source,
            } => Error::FileSystem {
                path,
                operation: format!("{context}: {operation}"),
                source,
            },
            Error::Json { message, source } => Error::Json {
                message: format!("{context}: {message}"),
                source,
            },
            Error::Report { path, message } => Error::Report {
                path,
                message: format!("{context}: {message}"),
            },
            Error::Experiment {
                experiment_id,
                message,
            } => Error::Experiment {
                experiment_id,
                message: format!("{context}: {message}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_context_keeps_file_system_variant() {
        let result: Result<()> = Err(Error::file_system(
            "/tmp/r.json",
            "read report",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        ));
        let err = result.context("load report").unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
        assert_eq!(
            err.to_string(),
            "load report: read report failed for '/tmp/r.json': gone"
        );
    }

    #[test]
    fn test_context_converts_json_errors() {
        let result = serde_json::from_str::<u32>("\"seven\"");
        let err = result.context("parse count").unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
        assert!(err.to_string().starts_with("JSON error: parse count: "));
    }

    #[test]
    fn test_with_context_is_lazy() {
        let ok: Result<u8> = Ok(7);
        let value = ok
            .with_context(|| panic!("context must not be built on success"))
            .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_error_display() {
        let err = Error::experiment("exp_1", "params file missing");
        assert_eq!(
            err.to_string(),
            "experiment 'exp_1' error: params file missing"
        );

        let err = Error::report("/tmp/r.json", "summary mismatch").prefixed("verify".into());
        assert_eq!(
            err.to_string(),
            "invalid pipeline report '/tmp/r.json': verify: summary mismatch"
        );
    }
}
