//! REST API module for HTTP endpoints
//!
//! Provides the endpoints the board calls:
//! - `GET|POST /api/negotiate` - Hub connection info
//! - `* /api/events` - Receive an event (`POST` only writes)
//! - `GET /api/posts` - Replay stored records as posts

pub mod events;
pub mod negotiate;
pub mod posts;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "UNAVAILABLE".to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "UNAVAILABLE" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
