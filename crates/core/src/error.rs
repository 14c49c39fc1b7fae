//! Error types for trace operations
//!
//! The taxonomy distinguishes fatal construction failures from the
//! non-errors of the read path: a seek past the end of the stream is
//! reported through a cleared context, and a quark lookup miss through the
//! invalid-attribute sentinel — neither ever surfaces here. What does
//! surface: unreadable trace paths, unrecoverable parser failures, I/O, and
//! snapshot corruption.

use thiserror::Error;

/// All trace-core errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The trace path is missing or unusable. Fatal to construction: no
    /// partial trace object exists after this.
    #[error("failed to open trace at {path}: {reason}")]
    TraceOpen {
        /// Path that was rejected
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// The parser failed unrecoverably mid-stream. Parsers signal a plain
    /// end-of-stream with `Ok(None)`; this variant is for malformed input
    /// they cannot skip.
    #[error("parse error at {location}: {reason}")]
    Parse {
        /// Stream position of the failure, rendered by the parser
        location: String,
        /// What went wrong
        reason: String,
    },

    /// I/O error from the underlying stream or snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure while writing or reading an index snapshot.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An index snapshot failed validation (magic, version, or checksum).
    /// Callers should discard the snapshot and re-index.
    #[error("corrupt index snapshot: {0}")]
    Corruption(String),

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bug or invariant violation (e.g. a panicked indexing thread).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for trace-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Whether this error means a snapshot should be discarded and rebuilt.
    pub fn is_corruption(&self) -> bool {
        matches!(self, CoreError::Corruption(_))
    }
}
