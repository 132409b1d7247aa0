//! Error types for temporal-engine operations.
//!
//! Every failure is one of two kinds: a `RangeError` (well-formed input whose
//! value falls outside a defined bound) or a `TypeError` (structurally invalid
//! input). Nothing is retried; the error is returned to the caller as-is.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("RangeError: {0}")]
    Range(String),

    #[error("TypeError: {0}")]
    Type(String),
}

/// The kind of a [`TemporalError`], without its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Range,
    Type,
}

impl TemporalError {
    pub(crate) fn range(message: impl Into<String>) -> Self {
        TemporalError::Range(message.into())
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        TemporalError::Type(message.into())
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TemporalError::Range(_) => ErrorKind::Range,
            TemporalError::Type(_) => ErrorKind::Type,
        }
    }

    /// Returns the human-readable message, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            TemporalError::Range(msg) | TemporalError::Type(msg) => msg,
        }
    }
}

pub type Result<T> = std::result::Result<T, TemporalError>;
