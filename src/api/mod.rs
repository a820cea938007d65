//! API module for HTTP and WebSocket endpoints
//!
//! This module provides the REST endpoints used by the board and the
//! WebSocket hub endpoint that carries live updates.

pub mod http;
pub mod rest;
pub mod state;
pub mod websocket;

pub use http::create_router;
pub use state::AppState;
