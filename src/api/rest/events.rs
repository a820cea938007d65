//! Receive-event endpoint (the event store binding)

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, error};

use super::ApiError;
use crate::api::state::AppState;
use crate::types::Event;

/// * /api/events - Persist `{type, data}` from a `POST` body.
///
/// Other methods write nothing. The body is not validated: anything that is
/// not JSON is stored as an event without `type` and with `data: null`.
/// Subscribers hear about the write through the change feed, not from here.
pub async fn receive_event(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return StatusCode::OK.into_response();
    }

    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    debug!(%body, "event received");

    let event = Event::from_body(&body);
    let store = Arc::clone(&state.store);

    match tokio::task::spawn_blocking(move || store.append(event)).await {
        Ok(Ok(record)) => {
            debug!(id = %record.id, kind = ?record.kind, "event stored");
            StatusCode::OK.into_response()
        }
        Ok(Err(e)) => {
            error!(error = %e, "failed to store event");
            ApiError::internal(format!("failed to store event: {}", e)).into_response()
        }
        Err(e) => {
            error!(error = %e, "store task failed");
            ApiError::internal("store task failed").into_response()
        }
    }
}
