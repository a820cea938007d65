//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method},
    routing::{any, get},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::rest::{events, negotiate, posts};
use super::state::AppState;
use super::websocket::hub_handler;
use crate::config::ServerConfig;

/// Path of the WebSocket hub endpoint
pub const HUB_PATH: &str = "/api/hub";

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Broadcast hub
        .route(HUB_PATH, get(hub_handler))
        // Health check
        .route("/health", get(health_check))
        // REST API endpoints
        .route(
            "/api/negotiate",
            get(negotiate::negotiate).post(negotiate::negotiate),
        )
        .route("/api/events", any(events::receive_event))
        .route("/api/posts", get(posts::replay_posts))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the single board origin, credentials allowed
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-requested-with")])
        .allow_credentials(true);

    match config.origin_header() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!(error = %e, "no CORS origin allowed");
            cors
        }
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
