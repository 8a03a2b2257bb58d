//! Clock helpers. Intent validity windows are unix seconds; repository
//! records carry RFC-3339 strings like the rest of the system.

use chrono::{DateTime, Utc};

/// Current unix timestamp in seconds.
pub fn now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Current moment as an RFC-3339 string for record timestamps.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Seconds elapsed since an RFC-3339 timestamp. Returns `None` when the
/// timestamp does not parse or lies in the future.
pub fn age_in_seconds(rfc3339: &str) -> Option<u64> {
    let then = DateTime::parse_from_rfc3339(rfc3339).ok()?;
    let elapsed = Utc::now().signed_duration_since(then).num_seconds();
    if elapsed < 0 {
        None
    } else {
        Some(elapsed as u64)
    }
}
