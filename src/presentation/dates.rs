//! Date separators between messages.
//!
//! Pure functions of timestamps: no store access, no clock reads. Calendar days are taken in
//! the caller's time zone (normally [`chrono::Local`]), so two messages a few minutes apart on
//! either side of local midnight land in different groups.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::models::Message;

pub const TODAY_LABEL: &str = "Today";
pub const YESTERDAY_LABEL: &str = "Yesterday";

/// Calendar day of `timestamp` as seen in `tz`
pub fn calendar_day<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    timestamp.with_timezone(tz).date_naive()
}

/// True when `current` opens a new day group
pub fn should_insert_separator<Tz: TimeZone>(
    current: &Message,
    previous: Option<&Message>,
    tz: &Tz,
) -> bool {
    match previous {
        None => true,
        Some(previous) => {
            calendar_day(&current.created_at, tz) != calendar_day(&previous.created_at, tz)
        }
    }
}

/// "Today", "Yesterday", or DD/MM/YYYY
pub fn label_for(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        TODAY_LABEL.to_string()
    } else if today.pred_opt() == Some(day) {
        YESTERDAY_LABEL.to_string()
    } else {
        day.format("%d/%m/%Y").to_string()
    }
}

/// Separator label for every message that opens a day group, `None` for the rest
pub fn separator_labels<Tz: TimeZone>(
    messages: &[Message],
    today: NaiveDate,
    tz: &Tz,
) -> Vec<Option<String>> {
    messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            let previous = i.checked_sub(1).map(|p| &messages[p]);
            should_insert_separator(message, previous, tz)
                .then(|| label_for(calendar_day(&message.created_at, tz), today))
        })
        .collect()
}
