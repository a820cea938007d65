//! Client subscription manager
//!
//! A [`Session`] is one client's connection to the broadcast hub. It owns
//! the connection state, the handler table, the notifier used for diagnostic
//! messages and the application's callback slot.
//!
//! ```text
//! Disconnected ──connect──► Connecting ──handshake──► Connected
//!      ▲                        │                         │
//!      └────────── error ───────┴──────── drop/error ─────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hotseat::client::{ClientConfig, LogNotifier, Session};
//!
//! # async fn run() -> hotseat::client::ClientResult<()> {
//! let session = Session::with_default_handlers(
//!     ClientConfig::negotiate("http://127.0.0.1:7071/api/negotiate"),
//!     Arc::new(LogNotifier),
//! );
//! session.post_callback().bind(|post| println!("new post: {}", post));
//! session.connect().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod connection;
mod error;
mod handlers;
mod reconnect;
mod session;

pub use config::{ChannelEndpoint, ClientConfig, DEFAULT_CONNECT_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use handlers::{
    bind_connection_message, bind_post_change, is_falsy, render_payload, LogNotifier, Notifier,
};
pub use reconnect::ReconnectPolicy;
pub use session::{CallbackSlot, Handler, PostCallback, Session, SessionState};
