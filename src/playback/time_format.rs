// SPDX-License-Identifier: MPL-2.0
//! Time text helpers for the transport bar.

/// Milliseconds per second.
pub const MILLIS_PER_SECOND: u64 = 1_000;

/// Formats milliseconds in MM:SS or HH:MM:SS format.
///
/// # Examples
///
/// ```
/// use media_shell::playback::time_format::format_time;
///
/// assert_eq!(format_time(125_000), "02:05");
/// assert_eq!(format_time(3_665_000), "01:01:05");
/// ```
#[must_use]
pub fn format_time(millis: u64) -> String {
    let total_secs = millis / MILLIS_PER_SECOND;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Formats `current / total`, e.g. `01:05 / 02:00`.
#[must_use]
pub fn format_progress(current_ms: u64, total_ms: u64) -> String {
    format!("{} / {}", format_time(current_ms), format_time(total_ms))
}
