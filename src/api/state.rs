//! Shared application state for HTTP and WebSocket handlers

use std::sync::Arc;

use crate::broadcast::Hub;
use crate::config::ServerConfig;
use crate::event_store::EventStore;

/// State handed to every handler
pub struct AppState {
    /// Durable record store
    pub store: Arc<EventStore>,

    /// Broadcast hub the WebSocket sessions subscribe to
    pub hub: Arc<Hub>,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(store: Arc<EventStore>, hub: Arc<Hub>, config: ServerConfig) -> Self {
        Self { store, hub, config }
    }
}
