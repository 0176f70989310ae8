//! Walkthrough error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::driver::DriverError;

/// Result type for walkthrough steps.
pub type SampleResult<T> = Result<T, SampleError>;

/// Which query file failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFileKind {
    Schema,
    Data,
}

impl fmt::Display for QueryFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryFileKind::Schema => write!(f, "schema"),
            QueryFileKind::Data => write!(f, "data"),
        }
    }
}

/// Errors that abort the walkthrough.
#[derive(Debug, Error)]
pub enum SampleError {
    /// Driver call failed.
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    /// Schema or data file could not be read.
    #[error("failed to open {kind} file {path}: {source}")]
    QueryFile {
        kind: QueryFileKind,
        path: PathBuf,
        source: std::io::Error,
    },

    /// The query file was empty.
    #[error("{kind} file {path} is empty")]
    EmptyQueryFile { kind: QueryFileKind, path: PathBuf },

    /// The database was not found after setup.
    #[error("database '{0}' not found after setup")]
    DatabaseMissing(String),

    /// The seeded data did not pass the user count check.
    #[error("database check failed: expected {expected} users, found {found}")]
    CheckFailed { expected: i64, found: i64 },

    /// Console I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A fetch answer could not be rendered.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SampleError {
    /// The driver's error code, when a driver call caused the failure.
    pub fn driver_code(&self) -> Option<&str> {
        match self {
            SampleError::Driver(e) => e.code(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_file_message() {
        let err = SampleError::QueryFile {
            kind: QueryFileKind::Schema,
            path: PathBuf::from("iam-schema.tql"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.to_string(),
            "failed to open schema file iam-schema.tql: not found"
        );
        assert!(err.driver_code().is_none());
    }

    #[test]
    fn test_driver_code() {
        let err = SampleError::from(DriverError::driver("TXN08", "query failed"));
        assert_eq!(err.driver_code(), Some("TXN08"));
    }
}
