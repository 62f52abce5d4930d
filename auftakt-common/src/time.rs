//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current wall-clock time in milliseconds since the Unix epoch
///
/// Captured once per deck run as the base timestamp; card timestamps are
/// derived from it rather than read from the clock again.
pub fn now_millis() -> i64 {
    now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_now_millis_matches_seconds() {
        let before = now().timestamp();
        let millis = now_millis();
        let after = now().timestamp();
        assert!(millis / 1000 >= before);
        assert!(millis / 1000 <= after);
    }

    #[test]
    fn test_now_millis_successive_calls_do_not_regress() {
        let first = now_millis();
        std::thread::sleep(Duration::from_millis(5));
        let second = now_millis();
        assert!(second >= first);
    }
}
