//! Data types for the Hotseat board
//!
//! This module contains the core data structures shared by the store, the
//! broadcast hub and the client.

mod connection;
mod event;
mod post;

pub use connection::ConnectionInfo;
pub use event::{Event, StoredRecord};
pub use post::{ReplayPost, MAX_PLACEHOLDER_VOTES};

/// Result type for binary entry points
pub type HotseatResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
