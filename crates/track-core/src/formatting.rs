/// Format a second count as `MM:SS`, or `H:MM:SS` once a full hour is
/// reached. Hours are unpadded; minutes and seconds are zero-padded to two
/// digits.
///
/// # Examples
///
/// ```
/// use track_core::formatting::format_duration;
///
/// assert_eq!(format_duration(0),    "00:00");
/// assert_eq!(format_duration(65),   "01:05");
/// assert_eq!(format_duration(3661), "1:01:01");
/// ```
pub fn format_duration(total_seconds: i64) -> String {
    let (minutes, seconds) = (total_seconds / 60, total_seconds % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Caption-bar label for one level marker: `M{map:02} {hms}`.
///
/// # Examples
///
/// ```
/// use track_core::formatting::map_label;
///
/// assert_eq!(map_label(1, "01:23"), "M01 01:23");
/// assert_eq!(map_label(30, "1:02:03"), "M30 1:02:03");
/// ```
pub fn map_label(map: i64, hms: &str) -> String {
    format!("M{:02} {}", map, hms)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
