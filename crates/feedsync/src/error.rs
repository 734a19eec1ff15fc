//! Error types for the engine.

use std::time::Duration;

use feedsync_core::{PostId, ValidationError};
use feedsync_store::StoreError;
use thiserror::Error;

/// Errors that can occur during engine operations.
///
/// Every variant leaves the feed cache exactly as it was before the call.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Another mutating operation holds the gate.
    #[error("another operation is in progress")]
    Busy,

    /// Content failed local validation; the store was not called.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The post is not in the local feed; the store was not called.
    #[error("post not found: {0}")]
    NotFound(PostId),

    /// The store call failed.
    #[error("remote error: {0}")]
    Remote(#[from] StoreError),

    /// The store acknowledged an insert without returning the record.
    #[error("store returned no record for insert")]
    NoRecordReturned,

    /// The store call exceeded the configured timeout.
    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),
}

impl EngineError {
    /// True if the failure happened before any remote call was made.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            EngineError::Busy | EngineError::Validation(_) | EngineError::NotFound(_)
        )
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
