//! Time-related utilities.

use chrono::{DateTime, FixedOffset, Utc};

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap() // JST is UTC+9
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&jst());
    now_jst.timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to JST RFC 3339 format
///
/// Out-of-range timestamps fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .with_timezone(&jst())
        .to_rfc3339()
}

/// Format an elapsed duration given in milliseconds as `MmSs` or `Ss`.
///
/// Sub-second remainders are truncated.
///
/// ```
/// use goji_shared::time::format_elapsed;
///
/// assert_eq!(format_elapsed(83_400), "1m23s");
/// assert_eq!(format_elapsed(9_999), "9s");
/// ```
pub fn format_elapsed(elapsed_millis: u64) -> String {
    let total_seconds = elapsed_millis / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
