//! Time and timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current Unix timestamp in seconds
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Format a Unix timestamp as RFC 3339, or `None` if it is out of range
pub fn format_timestamp(ts: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_timestamp_is_recent() {
        // 2023-11-14
        assert!(current_timestamp() > 1_700_000_000);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(
            format_timestamp(1_700_000_000).as_deref(),
            Some("2023-11-14T22:13:20Z")
        );
        assert_eq!(format_timestamp(i64::MAX), None);
    }
}
