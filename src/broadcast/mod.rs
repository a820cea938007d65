//! Broadcast module: the event fan-out core
//!
//! - `message`: named hub messages (`{target, arguments}`)
//! - `hub`: in-process pub/sub channel every WebSocket session subscribes to
//! - `dispatcher`: committed records → `eventCreated` messages, one batch per commit
//! - `trigger`: the store-triggered function binding a change feed to the dispatcher
//!
//! ```text
//! EventStore ──commit──► ChangeFeed ──batch──► SendEvents ──► BroadcastDispatcher ──► Hub ──► sessions
//! ```

pub mod dispatcher;
pub mod error;
pub mod hub;
pub mod message;
pub mod trigger;

pub use dispatcher::{to_broadcast_messages, BroadcastDispatcher, Transport};
pub use error::{PublishError, PublishResult};
pub use hub::{Frame, Hub};
pub use message::{HubMessage, BROADCAST_MESSAGE, ECHO, EVENT_CREATED, POST_CHANGE};
pub use trigger::SendEvents;
