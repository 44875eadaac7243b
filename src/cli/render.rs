//! Plain-text rendering of conversation views for the terminal

use crate::models::{Message, Role};
use crate::presentation::ConversationView;
use crate::utils::sanitize_for_terminal;

pub const EMPTY_STATE_TEXT: &str = "No messages yet. Send one to start the conversation.";
pub const TYPING_TEXT: &str = "AI is typing...";

pub fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "AI",
    }
}

pub fn separator_line(label: &str) -> String {
    format!("──────── {} ────────", label)
}

/// "[09:15] AI: text", with the text sanitized for the terminal
pub fn message_line(time: &str, message: &Message) -> String {
    format!("[{}] {}: {}", time, speaker(message.role), sanitize_for_terminal(&message.content))
}

pub fn render_view(view: &ConversationView) -> String {
    let mut lines = Vec::with_capacity(view.rows.len() * 2 + 2);

    if view.show_empty_state() {
        lines.push(EMPTY_STATE_TEXT.to_string());
    }
    if let Some(reason) = view.error_reason() {
        lines.push(format!("! {}", reason));
    }

    for row in &view.rows {
        if let Some(label) = &row.separator {
            lines.push(separator_line(label));
        }
        lines.push(message_line(&row.time, &row.message));
    }

    if view.busy {
        lines.push(TYPING_TEXT.to_string());
    }

    lines.join("\n")
}
