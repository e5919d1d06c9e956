//! Duration formatting for display.

/// Formats seconds as a panel-style duration string.
/// Always renders both components, so zero is `"0h 0m"`.
#[must_use]
pub fn format_hours_minutes(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours}h {minutes}m")
}
