use chrono::{DateTime, Utc};

/// Formats a timestamp the way the site prints publication dates,
/// e.g. `January 24, 2024`.
pub fn format_display_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}
