//! Human-readable strings for the navigation panel.

/// Format a distance the way turn-by-turn panels show it: metres rounded to
/// ten below one kilometre, tenths of a kilometre above.
///
/// ```
/// assert_eq!(nav_core::format_distance(347.0), "350 m");
/// assert_eq!(nav_core::format_distance(1_240.0), "1.2 km");
/// ```
pub fn format_distance(meters: f64) -> String {
    let meters = meters.max(0.0);
    if meters >= 1_000.0 {
        format!("{:.1} km", meters / 1_000.0)
    } else {
        format!("{} m", (meters / 10.0).round() as i64 * 10)
    }
}

/// Format a duration as `MM:SS`, or `H:MM:SS` from one hour up.
///
/// ```
/// assert_eq!(nav_core::format_duration(75.0), "01:15");
/// assert_eq!(nav_core::format_duration(3_725.0), "1:02:05");
/// ```
pub fn format_duration(secs: f64) -> String {
    let total = if secs.is_finite() { secs.max(0.0).round() as u64 } else { 0 };
    let hours = total / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
