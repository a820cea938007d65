//! Utility functions and helpers
//!
//! This module contains timestamp utilities and logging setup.

pub mod logging;
pub mod time;

pub use logging::{init_logging, DEFAULT_LOG_FILTER};
pub use time::{current_timestamp, format_timestamp};
