//! Errors returned by the subscription service.

use thiserror::Error;

use subtrack_core::storage::RepositoryError;
use subtrack_core::subscription::{FormatError, RangeError, ValidationError};

use super::Interrupted;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidDate(#[from] FormatError),
    #[error(transparent)]
    InvalidRange(#[from] RangeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Subscription not found: {id}")]
    NotFound { id: String },
    #[error("Storage error: {0}")]
    Storage(RepositoryError),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Operation timed out")]
    Timeout,
}

impl ServiceError {
    /// Returns true if the caller sent bad input or asked for a missing row.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidDate(_)
                | ServiceError::InvalidRange(_)
                | ServiceError::Validation(_)
                | ServiceError::NotFound { .. }
        )
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id, .. } => ServiceError::NotFound { id },
            other => ServiceError::Storage(other),
        }
    }
}

impl From<Interrupted> for ServiceError {
    fn from(err: Interrupted) -> Self {
        match err {
            Interrupted::Cancelled => ServiceError::Cancelled,
            Interrupted::TimedOut => ServiceError::Timeout,
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
