//! Criteria error types.

use thiserror::Error;

/// Errors raised while building or compiling criteria.
///
/// Every variant is a programmer error surfaced at the offending call.
/// Accumulators validate before they mutate, so an `Err` never leaves a
/// half-applied criterion behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl CriteriaError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }
}

/// Result type alias using CriteriaError.
pub type CriteriaResult<T> = Result<T, CriteriaError>;
