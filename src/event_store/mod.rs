//! Event Store Module
//!
//! This module provides durable storage for submitted events and the change
//! feed that observes commits:
//! - `EventStore`: append-only `events.jsonl` log, loaded on open
//! - `ChangeFeed`: per-observer queue of committed batches
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌─────────┐    ┌──────────────┐    ┌──────────────┐    ┌─────────────┐
//! │  HTTP   │───►│ append line  │───►│ fsync        │───►│ notify each │
//! │ request │    │ events.jsonl │    │              │    │ change feed │
//! └─────────┘    └──────────────┘    └──────────────┘    └─────────────┘
//! ```

mod change_feed;
mod store;

pub use change_feed::ChangeFeed;
pub use store::{EventStore, EventStoreConfig, StoreError, StoreResult};
