//! Broadcast errors

use thiserror::Error;

/// Result type for publish operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors raised while publishing to the hub
#[derive(Debug, Error)]
pub enum PublishError {
    /// The hub has been shut down and accepts no more messages
    #[error("broadcast hub is closed")]
    Closed,

    #[error("failed to serialize broadcast message: {0}")]
    Serialize(#[from] serde_json::Error),
}
