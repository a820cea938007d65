//! Event Store - append-only record log
//!
//! The EventStore persists every submitted event as one JSON line in
//! `events.jsonl` and tells change feed subscribers about each commit.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::change_feed::ChangeFeed;
use crate::types::{Event, StoredRecord};
use crate::utils::current_timestamp;

/// Configuration for the EventStore
#[derive(Debug, Clone)]
pub struct EventStoreConfig {
    /// Path to the data directory
    pub data_dir: PathBuf,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl EventStoreConfig {
    /// Create config with custom data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get path to events.jsonl
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join("events.jsonl")
    }
}

/// Result type for EventStore operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in EventStore operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Commit-side state, locked for the whole of a commit so that
/// notifications go out in commit order
struct CommitState {
    subscribers: Vec<mpsc::UnboundedSender<Vec<StoredRecord>>>,
}

/// The EventStore manages the append-only record log
pub struct EventStore {
    config: EventStoreConfig,
    records: RwLock<Vec<StoredRecord>>,
    commit: Mutex<CommitState>,
}

impl EventStore {
    /// Open the store, loading any records already on disk
    pub fn open(config: EventStoreConfig) -> StoreResult<Self> {
        std::fs::create_dir_all(config.data_dir())?;
        let records = Self::load_records(&config.events_path())?;

        info!(
            path = %config.events_path().display(),
            records = records.len(),
            "event store opened"
        );

        Ok(Self {
            config,
            records: RwLock::new(records),
            commit: Mutex::new(CommitState {
                subscribers: Vec::new(),
            }),
        })
    }

    /// Number of committed records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// All committed records in commit order
    pub fn records(&self) -> Vec<StoredRecord> {
        self.records.read().clone()
    }

    /// Register a change feed that receives every batch committed from now on
    pub fn subscribe(&self) -> ChangeFeed {
        let (tx, rx) = mpsc::unbounded_channel();
        self.commit.lock().subscribers.push(tx);
        ChangeFeed::new(rx)
    }

    /// Persist a single event
    pub fn append(&self, event: Event) -> StoreResult<StoredRecord> {
        let mut committed = self.append_batch(vec![event])?;
        // append_batch returns one record per event
        Ok(committed.remove(0))
    }

    /// Persist several events as one commit.
    ///
    /// The lines are written and synced to disk before the batch is handed
    /// to change feed subscribers. An empty batch commits nothing and
    /// notifies nobody.
    pub fn append_batch(&self, events: Vec<Event>) -> StoreResult<Vec<StoredRecord>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let mut commit = self.commit.lock();

        let ts = current_timestamp();
        let batch: Vec<StoredRecord> = events
            .into_iter()
            .map(|event| StoredRecord::from_event(event, ts))
            .collect();

        let mut lines = String::new();
        for record in &batch {
            lines.push_str(&record.to_json_line()?);
            lines.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.config.events_path())?;
        file.write_all(lines.as_bytes())?;
        file.sync_all()?;

        self.records.write().extend(batch.iter().cloned());

        commit
            .subscribers
            .retain(|tx| tx.send(batch.clone()).is_ok());

        debug!(
            count = batch.len(),
            subscribers = commit.subscribers.len(),
            "batch committed"
        );

        Ok(batch)
    }

    /// Read every record from the log, skipping lines that do not parse
    fn load_records(path: &Path) -> StoreResult<Vec<StoredRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match StoredRecord::from_json_line(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(line = line_num + 1, error = %e, "skipping unparseable record");
                }
            }
        }

        Ok(records)
    }
}
