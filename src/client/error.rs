//! Client errors

use std::time::Duration;

use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised by a hub session
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("negotiate failed: {0}")]
    Negotiate(#[from] reqwest::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("connection attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid hub frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("session is not connected")]
    NotConnected,
}
