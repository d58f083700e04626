//! Timestamp formats and conversions.
//!
//! Three textual forms are in play:
//! - Stored form (`YYYY-MM-DD HH:MM:SS`, UTC) used by the durable record
//! - Input form (`YYYY-MM-DDTHH:MM:SS`, local wall clock) typed by the user
//! - Display form (local time with offset) used in export headers
//!
//! All stored instants are `DateTime<Utc>`; anything local exists only at
//! the parse/render boundary.

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};

/// Format of timestamps in the durable chapter record (UTC).
pub const STORED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format the user types into the start-time field (local wall clock).
pub const INPUT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format for header lines in exported documents (local time).
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Format embedded in export artifact file names (local time).
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Format a UTC instant in the stored form.
///
/// Seconds precision; sub-second information is discarded.
pub fn format_stored(ts: DateTime<Utc>) -> String {
    ts.format(STORED_TIME_FORMAT).to_string()
}

/// Parse a stored-form timestamp back to a UTC instant.
pub fn parse_stored(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, STORED_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse a user-typed start time as local wall-clock time, in UTC.
///
/// Returns `None` for malformed input and for local times that do not
/// exist (DST gap).
pub fn parse_user_input(raw: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, INPUT_TIME_FORMAT).ok()?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(local.with_timezone(&Utc))
}

/// Render a UTC instant in local time for display.
pub fn format_display_local(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(DISPLAY_TIME_FORMAT).to_string()
}

/// Render a UTC instant as a local-time file name stamp.
pub fn format_file_stamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(FILE_STAMP_FORMAT).to_string()
}

/// Format an elapsed duration as `MM:SS`, or `HH:MM:SS` once it reaches
/// an hour.
///
/// Truncates to whole seconds (no rounding). Negative durations clamp
/// to `00:00`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.num_seconds().max(0);

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
