//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::rest::ApiError;
use crate::api::state::AppState;
use crate::broadcast::{Frame, HubMessage, BROADCAST_MESSAGE, ECHO};

/// Query parameters for a hub connection
#[derive(Debug, Deserialize)]
pub struct HubParams {
    /// Connection id handed out by negotiate, used for logging
    pub id: Option<String>,
}

/// WebSocket upgrade handler
pub async fn hub_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<HubParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    // Subscribe before the upgrade completes so nothing published after the
    // handshake can be missed
    let Some(rx) = state.hub.subscribe() else {
        return ApiError::unavailable("broadcast hub is closed").into_response();
    };

    let connection_id = params
        .id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    ws.on_upgrade(move |socket| handle_socket(socket, state, rx, connection_id))
}

/// Handle an individual hub session
async fn handle_socket(
    mut socket: WebSocket,
    state: Arc<AppState>,
    mut rx: broadcast::Receiver<Frame>,
    connection_id: String,
) {
    info!(%connection_id, "hub session connected");

    loop {
        tokio::select! {
            // Hub messages to client
            result = rx.recv() => {
                match result {
                    Ok(frame) => {
                        if socket.send(Message::Text(frame.to_string())).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Client is too slow; the oldest frames are gone
                        warn!(%connection_id, missed = n, "hub session lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break; // Hub shut down
                    }
                }
            }

            // Client frames
            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket, &state, &connection_id).await {
                            break; // Client requested close
                        }
                    }
                    Some(Err(_)) => break, // WebSocket error
                    None => break, // Client disconnected
                }
            }
        }
    }

    info!(%connection_id, "hub session closed");
}

/// Handle a frame from the client.
/// Returns false if the connection should be closed.
async fn handle_client_message(
    msg: Message,
    socket: &mut WebSocket,
    state: &AppState,
    connection_id: &str,
) -> bool {
    match msg {
        Message::Text(text) => {
            let invocation = match HubMessage::from_json(&text) {
                Ok(invocation) => invocation,
                Err(e) => {
                    debug!(%connection_id, error = %e, "ignoring malformed client frame");
                    return true;
                }
            };

            match invocation.target.as_str() {
                BROADCAST_MESSAGE => {
                    if let Err(e) = state.hub.publish_message(&invocation) {
                        warn!(%connection_id, error = %e, "failed to broadcast client message");
                    }
                }
                ECHO => {
                    if let Ok(json) = invocation.to_json() {
                        let _ = socket.send(Message::Text(json)).await;
                    }
                }
                other => {
                    debug!(%connection_id, invocation = other, "ignoring unknown invocation");
                }
            }
            true
        }
        Message::Binary(_) => true, // Ignore binary messages
        Message::Ping(data) => {
            let _ = socket.send(Message::Pong(data)).await;
            true
        }
        Message::Pong(_) => true, // Ignore pong responses
        Message::Close(_) => false, // Client requested close
    }
}
