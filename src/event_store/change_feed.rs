//! Change feed: committed batches as seen by an observer

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::types::StoredRecord;

/// Receives every batch the store commits after the feed was opened.
///
/// Batches arrive in commit order and are never empty. Each feed has its
/// own unbounded queue, so a slow observer delays but never loses records.
pub struct ChangeFeed {
    rx: mpsc::UnboundedReceiver<Vec<StoredRecord>>,
}

impl ChangeFeed {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<Vec<StoredRecord>>) -> Self {
        Self { rx }
    }

    /// Wait for the next committed batch; `None` once the store is gone
    pub async fn next_batch(&mut self) -> Option<Vec<StoredRecord>> {
        self.rx.recv().await
    }

    /// Take a batch that is already queued, without waiting
    pub fn try_next_batch(&mut self) -> Option<Vec<StoredRecord>> {
        self.rx.try_recv().ok()
    }

    /// Consume the feed as a stream of batches
    pub fn into_stream(self) -> impl Stream<Item = Vec<StoredRecord>> {
        UnboundedReceiverStream::new(self.rx)
    }
}
