//! Driver error types.

use thiserror::Error;

/// Result type for driver operations.
pub type DriverResult<T = ()> = Result<T, DriverError>;

/// Errors surfaced by the graph database driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Error reported by the driver, with its error code and message.
    #[error("{code}: {message}")]
    Driver { code: String, message: String },

    /// The server could not be reached.
    #[error("failed to connect to {address}: {reason}")]
    Connection { address: String, reason: String },

    /// A query that should produce an answer produced none.
    #[error("query returned no answer: {0}")]
    NoAnswer(String),

    /// An answer did not have the expected shape.
    #[error("unexpected answer: {0}")]
    UnexpectedAnswer(String),
}

impl DriverError {
    /// Create a driver error from a code and message.
    pub fn driver(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Driver {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The driver's error code, if the error came from the driver.
    pub fn code(&self) -> Option<&str> {
        match self {
            DriverError::Driver { code, .. } => Some(code),
            _ => None,
        }
    }
}
