//! Derived, read-only views for the rendering layer.
//!
//! Everything here is recomputed from the store's ordered sequence on each read:
//!
//! - [`dates`] - day separators and their labels
//! - [`timestamps`] - clock-time formatting
//! - [`view`] - the [`ConversationView`] snapshot (rows, busy flag, error banner)

pub mod dates;
pub mod timestamps;
pub mod view;

pub use dates::{calendar_day, label_for, separator_labels, should_insert_separator};
pub use timestamps::format_clock_time;
pub use view::{ConversationView, MessageRow};
