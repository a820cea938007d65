//! Broadcast dispatcher: committed records → `eventCreated` messages

use std::sync::Arc;

use tracing::debug;

use super::error::PublishResult;
use super::hub::Hub;
use super::message::HubMessage;
use crate::types::StoredRecord;

/// Something a batch of hub messages can be published to
pub trait Transport: Send + Sync {
    /// Publish the whole batch in order, returning how many were published
    fn publish(&self, messages: Vec<HubMessage>) -> PublishResult<usize>;
}

impl Transport for Hub {
    fn publish(&self, messages: Vec<HubMessage>) -> PublishResult<usize> {
        self.publish_batch(&messages)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn publish(&self, messages: Vec<HubMessage>) -> PublishResult<usize> {
        (**self).publish(messages)
    }
}

/// Map each record to one `eventCreated` message, preserving order
pub fn to_broadcast_messages(records: &[StoredRecord]) -> PublishResult<Vec<HubMessage>> {
    records
        .iter()
        .map(|record| HubMessage::event_created(record).map_err(Into::into))
        .collect()
}

/// Turns committed batches into hub broadcasts
pub struct BroadcastDispatcher<T> {
    transport: T,
}

impl<T: Transport> BroadcastDispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Publish one `eventCreated` message per record, as a single batch.
    ///
    /// An absent or empty batch publishes nothing and returns `Ok(0)`.
    pub fn dispatch(&self, records: Option<&[StoredRecord]>) -> PublishResult<usize> {
        let records = match records {
            Some(records) if !records.is_empty() => records,
            _ => return Ok(0),
        };

        let messages = to_broadcast_messages(records)?;
        let published = self.transport.publish(messages)?;
        debug!(published, "dispatched committed records");
        Ok(published)
    }
}
