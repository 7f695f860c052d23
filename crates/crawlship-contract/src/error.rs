//! Contract validation errors.

use crawlship_runtime::error::RuntimeError;
use thiserror::Error;

use crate::check::Check;

/// Why an image failed validation.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A required piece of the contract is missing from the image.
    #[error("{message}")]
    NotFound {
        /// Check that failed.
        check: Check,
        /// User-facing explanation.
        message: String,
    },

    /// The runtime itself failed while a check was running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl ContractError {
    /// Returns the failing check, if the failure is a contract violation.
    #[must_use]
    pub const fn check(&self) -> Option<Check> {
        match self {
            Self::NotFound { check, .. } => Some(*check),
            Self::Runtime(_) => None,
        }
    }
}

/// Convenience alias for contract results.
pub type Result<T> = std::result::Result<T, ContractError>;
