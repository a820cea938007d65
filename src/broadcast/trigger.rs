//! Store-triggered send-events function
//!
//! Binds a store change feed to a broadcast dispatcher: every committed
//! batch the feed yields is dispatched as `eventCreated` messages.

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::dispatcher::{BroadcastDispatcher, Transport};
use super::error::PublishResult;
use crate::event_store::ChangeFeed;
use crate::types::StoredRecord;

/// The change feed listener that forwards commits to the dispatcher
pub struct SendEvents<T> {
    dispatcher: BroadcastDispatcher<T>,
}

impl<T: Transport + 'static> SendEvents<T> {
    pub fn new(dispatcher: BroadcastDispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Handle one trigger invocation.
    ///
    /// Absent or empty input is a no-op.
    pub fn invoke(&self, documents: Option<Vec<StoredRecord>>) -> PublishResult<usize> {
        self.dispatcher.dispatch(documents.as_deref())
    }

    /// Drive the listener from `feed` until the store goes away.
    ///
    /// Publish failures are logged and not retried; the next batch is
    /// handled as usual.
    pub async fn run(self, feed: ChangeFeed) {
        let mut batches = feed.into_stream();

        while let Some(batch) = batches.next().await {
            let count = batch.len();
            if let Err(e) = self.invoke(Some(batch)) {
                error!(error = %e, records = count, "failed to publish committed records");
            }
        }

        info!("change feed closed, send-events trigger stopped");
    }

    /// Run the listener on its own task
    pub fn spawn(self, feed: ChangeFeed) -> JoinHandle<()> {
        tokio::spawn(self.run(feed))
    }
}
