//! Replay post shape served to the board on load

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StoredRecord;

/// Upper bound (exclusive) of the placeholder vote count
pub const MAX_PLACEHOLDER_VOTES: u32 = 4;

/// A stored record reshaped for the board
///
/// `vote_count` and `is_starred` are placeholders: there is no vote
/// tracking behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayPost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    pub vote_count: u32,
    pub is_starred: bool,
    #[serde(rename = "_ts")]
    pub ts: i64,
    pub replies: Vec<Value>,
}

impl ReplayPost {
    /// Reshape a record, drawing placeholder fields from `rng`
    pub fn from_record<R: Rng + ?Sized>(record: &StoredRecord, rng: &mut R) -> Self {
        Self {
            message: record.data.get("message").cloned(),
            vote_count: rng.gen_range(0..MAX_PLACEHOLDER_VOTES),
            is_starred: rng.gen_bool(0.5),
            ts: record.ts,
            replies: Vec::new(),
        }
    }
}
