//! Unified error types for Sediment.
//!
//! This module provides the error type exposed by the facade, wrapping the
//! internal core errors behind a stable interface.

use thiserror::Error;

/// All Sediment errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A trace path was missing or unusable at construction time.
    #[error("trace open failed: {0}")]
    TraceOpen(String),

    /// The parser hit unrecoverable input mid-stream.
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure (index snapshot).
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An index snapshot failed validation; discard it and re-index.
    #[error("corrupt index snapshot: {0}")]
    Corruption(String),

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Bug or invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for Sediment operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error means a snapshot should be discarded and rebuilt.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corruption(_))
    }
}

// Convert from internal core errors
impl From<sediment_core::CoreError> for Error {
    fn from(e: sediment_core::CoreError) -> Self {
        use sediment_core::CoreError;
        match e {
            CoreError::TraceOpen { path, reason } => {
                Error::TraceOpen(format!("{path}: {reason}"))
            }
            CoreError::Parse { location, reason } => {
                Error::Parse(format!("{location}: {reason}"))
            }
            CoreError::Io(io_err) => Error::Io(io_err),
            CoreError::Serialization(msg) => Error::Serialization(msg),
            CoreError::Corruption(msg) => Error::Corruption(msg),
            CoreError::InvalidConfig(msg) => Error::Config(msg),
            CoreError::Internal(msg) => Error::Internal(msg),
        }
    }
}
