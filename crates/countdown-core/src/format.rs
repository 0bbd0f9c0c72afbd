//! Display formatting for remaining time and the completion instant.

use chrono::{DateTime, Local, Utc};

/// Render `secs` as zero-padded `HH:MM:SS`.
///
/// Hours are not wrapped at 24, so anything past a day keeps growing the
/// first field.
pub fn as_time_string(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Local `HH:MM` of the projected completion instant.
pub fn completion_time_string(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M").to_string()
}
