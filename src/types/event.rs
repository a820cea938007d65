//! Event and stored record types
//!
//! An `Event` is what a client submits: a `type` tag and an opaque JSON
//! payload. Once the store commits it, it becomes a `StoredRecord` carrying
//! a store-assigned id and creation timestamp. Records are never mutated.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A client-submitted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event kind (`type` on the wire)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Opaque payload, stored untouched
    #[serde(default)]
    pub data: Value,
}

impl Event {
    /// Create a new event
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: Some(kind.into()),
            data,
        }
    }

    /// Normalize an inbound request body into an event.
    ///
    /// Only `type` and `data` are kept. Nothing is validated: a missing or
    /// non-string `type` becomes `None`, a missing `data` becomes `null`.
    pub fn from_body(body: &Value) -> Self {
        Self {
            kind: body
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string),
            data: body.get("data").cloned().unwrap_or(Value::Null),
        }
    }
}

/// A persisted event plus store metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Store-assigned unique id
    pub id: String,

    /// Event kind (`type` on the wire)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Opaque payload
    #[serde(default)]
    pub data: Value,

    /// Unix timestamp (seconds) of the commit
    #[serde(rename = "_ts")]
    pub ts: i64,
}

impl StoredRecord {
    /// Stamp an event with a fresh id and the given commit time
    pub fn from_event(event: Event, ts: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: event.kind,
            data: event.data,
            ts,
        }
    }

    /// Serialize to a single JSON line for the log
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from a single JSON line of the log
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
