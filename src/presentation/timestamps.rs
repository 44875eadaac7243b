use chrono::{DateTime, TimeZone, Utc};

/// Format a message time as "HH:MM" in `tz`
pub fn format_clock_time<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> String {
    timestamp.with_timezone(tz).naive_local().format("%H:%M").to_string()
}
