use chrono::{NaiveDate, TimeZone};

use super::dates::separator_labels;
use super::timestamps::format_clock_time;
use crate::error::ErrorKind;
use crate::models::Message;

/// One rendered message with its optional day separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub separator: Option<String>,
    pub time: String,
    pub message: Message,
}

/// Read-only snapshot handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationView {
    pub rows: Vec<MessageRow>,
    /// A send is pending: disable input, show the typing indicator
    pub busy: bool,
    pub error: Option<ErrorKind>,
}

impl ConversationView {
    pub fn build<Tz: TimeZone>(
        messages: &[Message],
        busy: bool,
        error: Option<ErrorKind>,
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let rows = messages
            .iter()
            .zip(separator_labels(messages, today, tz))
            .map(|(message, separator)| MessageRow {
                separator,
                time: format_clock_time(&message.created_at, tz),
                message: message.clone(),
            })
            .collect();

        Self { rows, busy, error }
    }

    /// Banner text, if an error is showing
    pub fn error_reason(&self) -> Option<&'static str> {
        self.error.map(|kind| kind.reason())
    }

    /// The "start a conversation" placeholder; never shown together with an error
    pub fn show_empty_state(&self) -> bool {
        self.rows.is_empty() && self.error.is_none()
    }
}
