//! Hotseat Board Server
//!
//! A real-time posting board: clients submit events over HTTP, the events
//! are persisted, and every connected client hears about each new record
//! over a WebSocket broadcast hub.
//!
//! # Features
//!
//! - **Durable**: append-only JSONL record log, fsync per commit
//! - **Change feed**: every commit reaches each observer, in order, as a batch
//! - **Fan-out**: one `eventCreated` message per committed record
//! - **Client**: session state machine with typed handlers and optional reconnect
//!
//! # Modules
//!
//! - `types`: Core data structures (Event, StoredRecord, ReplayPost)
//! - `event_store`: Record log and change feed
//! - `broadcast`: Hub, dispatcher and the store-triggered send-events function
//! - `api`: Axum router, REST endpoints and the WebSocket hub endpoint
//! - `client`: Client subscription manager
//! - `server`: Wiring and lifecycle of a running server
//! - `config`: Server configuration
//! - `utils`: Timestamps and logging setup
//!
//! # Example
//!
//! ```no_run
//! use hotseat::{config::ServerConfig, server};
//!
//! #[tokio::main]
//! async fn main() -> hotseat::types::HotseatResult<()> {
//!     let handle = server::start(ServerConfig::new("data")).await?;
//!     tokio::signal::ctrl_c().await?;
//!     handle.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod broadcast;
pub mod client;
pub mod config;
pub mod event_store;
pub mod server;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use broadcast::{BroadcastDispatcher, Hub, HubMessage, SendEvents, Transport};
pub use client::{ClientConfig, Session, SessionState};
pub use config::ServerConfig;
pub use event_store::{ChangeFeed, EventStore, EventStoreConfig};
pub use types::{ConnectionInfo, Event, ReplayPost, StoredRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
