//! WebSocket module for the broadcast hub
//!
//! Provides the hub endpoint at `/api/hub`. Every session receives every hub
//! message as a `{"target", "arguments"}` text frame.
//!
//! ## Client invocations
//! - `broadcastMessage`: re-published to every session
//! - `echo`: sent back to the calling session only

pub mod handler;

pub use handler::hub_handler;
