//! Negotiate response

use serde::{Deserialize, Serialize};

/// What a client needs to open a hub session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    /// WebSocket URL of the hub
    pub url: String,

    /// Id the session is logged under
    pub connection_id: String,
}

impl ConnectionInfo {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connection_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}
