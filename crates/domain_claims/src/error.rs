//! Claims domain errors

use core_kernel::{AdapterError, ErrorCategory};
use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Local validation failed; no remote call was attempted
    #[error("Invalid claim input: {0}")]
    InvalidInput(String),

    #[error("Unknown claim status: {0}")]
    UnknownStatus(String),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl ClaimError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ClaimError::InvalidInput(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ClaimError::InvalidInput(_) | ClaimError::UnknownStatus(_) => ErrorCategory::ClientInput,
            ClaimError::Adapter(error) => error.category(),
        }
    }
}
