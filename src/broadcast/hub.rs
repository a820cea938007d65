//! In-process broadcast hub
//!
//! The hub owns the tokio broadcast channel that every connected WebSocket
//! session subscribes to. Messages are serialized once and shared between
//! sessions as `Arc<str>` frames.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use super::error::{PublishError, PublishResult};
use super::message::HubMessage;

/// A serialized hub message
pub type Frame = Arc<str>;

/// Broadcast hub shared by the dispatcher and all sessions
pub struct Hub {
    /// `None` once the hub is closed
    tx: RwLock<Option<broadcast::Sender<Frame>>>,

    /// Total messages published
    published: AtomicU64,
}

impl Hub {
    /// Create a new hub buffering `capacity` frames per subscriber.
    ///
    /// Sessions that fall further behind than that lose the oldest frames.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx: RwLock::new(Some(tx)),
            published: AtomicU64::new(0),
        }
    }

    /// Subscribe a session; `None` after the hub is closed
    pub fn subscribe(&self) -> Option<broadcast::Receiver<Frame>> {
        self.tx.read().as_ref().map(broadcast::Sender::subscribe)
    }

    /// Publish one message to every session, returning how many it reached
    pub fn publish_message(&self, message: &HubMessage) -> PublishResult<usize> {
        let frame: Frame = message.to_json()?.into();
        let guard = self.tx.read();
        let tx = guard.as_ref().ok_or(PublishError::Closed)?;

        // Zero receivers just means nobody is connected
        let reached = tx.send(frame).unwrap_or(0);
        self.published.fetch_add(1, Ordering::SeqCst);
        debug!(message_target = %message.target, reached, "hub message published");
        Ok(reached)
    }

    /// Publish messages in order, returning how many were published.
    ///
    /// Every message is serialized before the first one goes out, so a
    /// serialization failure publishes nothing.
    pub fn publish_batch(&self, messages: &[HubMessage]) -> PublishResult<usize> {
        let frames = messages
            .iter()
            .map(|m| m.to_json().map(Frame::from))
            .collect::<Result<Vec<_>, _>>()?;

        let guard = self.tx.read();
        let tx = guard.as_ref().ok_or(PublishError::Closed)?;

        let count = frames.len();
        for frame in frames {
            let _ = tx.send(frame);
        }
        self.published.fetch_add(count as u64, Ordering::SeqCst);
        debug!(count, subscribers = tx.receiver_count(), "hub batch published");
        Ok(count)
    }

    /// Number of connected sessions
    pub fn subscriber_count(&self) -> usize {
        self.tx
            .read()
            .as_ref()
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Total number of messages published so far
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::SeqCst)
    }

    /// Shut the hub down.
    ///
    /// Sessions drain what is already buffered and then see the channel
    /// close; later publishes fail with [`PublishError::Closed`].
    pub fn close(&self) {
        self.tx.write().take();
    }

    pub fn is_closed(&self) -> bool {
        self.tx.read().is_none()
    }
}
