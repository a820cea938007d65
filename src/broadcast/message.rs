//! Hub wire messages
//!
//! Every frame on the broadcast channel, in either direction, is a named
//! invocation: `{"target": "...", "arguments": [...]}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::StoredRecord;

/// Server → client: a record was committed
pub const EVENT_CREATED: &str = "eventCreated";
/// Client → all clients: diagnostic broadcast
pub const BROADCAST_MESSAGE: &str = "broadcastMessage";
/// Client → same client: diagnostic echo
pub const ECHO: &str = "echo";
/// Domain update forwarded to the application
pub const POST_CHANGE: &str = "postChange";

/// A named message carried by the hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubMessage {
    pub target: String,
    #[serde(default)]
    pub arguments: Vec<Value>,
}

impl HubMessage {
    pub fn new(target: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            target: target.into(),
            arguments,
        }
    }

    /// The `eventCreated` broadcast for one committed record
    pub fn event_created(record: &StoredRecord) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EVENT_CREATED, vec![serde_json::to_value(record)?]))
    }

    /// The first argument, which is the only one any handler reads
    pub fn payload(&self) -> Option<&Value> {
        self.arguments.first()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Event;
    use serde_json::json;

    #[test]
    fn test_event_created_wraps_record_unchanged() {
        let record = StoredRecord::from_event(Event::new("t", json!({"message": "hi"})), 10);
        let msg = HubMessage::event_created(&record).unwrap();

        assert_eq!(msg.target, "eventCreated");
        assert_eq!(msg.arguments.len(), 1);
        let back: StoredRecord = serde_json::from_value(msg.arguments[0].clone()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_arguments_parse_as_empty() {
        let msg = HubMessage::from_json(r#"{"target":"echo"}"#).unwrap();
        assert_eq!(msg.target, ECHO);
        assert!(msg.payload().is_none());
    }

    #[test]
    fn test_wire_shape() {
        let json = HubMessage::new(POST_CHANGE, vec![json!("x")]).to_json().unwrap();
        assert_eq!(json, r#"{"target":"postChange","arguments":["x"]}"#);
    }
}
