//! Error types for the feedsync core.

use thiserror::Error;

/// Local precondition failures, detected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("post content must not be empty")]
    EmptyContent,
}

/// Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
