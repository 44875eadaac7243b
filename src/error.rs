//! Error types for the sync engine.
//!
//! Three layers, innermost first:
//!
//! - [`StoreError`] - invariant signals from the message store
//! - [`ServiceError`] - transport and decoding failures talking to the conversation service
//! - [`ChatError`] - what session operations return to the caller
//!
//! Only some [`ChatError`]s are meant for the user; [`ChatError::kind`] classifies those into an
//! [`ErrorKind`] whose [`reason`](ErrorKind::reason) is the banner text.

use thiserror::Error;

use crate::models::MessageId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Id already present in the sequence; indicates broken id generation
    #[error("Duplicate message id: {0}")]
    DuplicateId(MessageId),

    /// Provisional record already reconciled or rolled back
    #[error("Message not found: {0}")]
    NotFound(MessageId),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else if e.is_decode() {
            ServiceError::Decode(e.to_string())
        } else {
            ServiceError::Network(e.to_string())
        }
    }
}

/// User-facing error classes, mutually exclusive with the empty-conversation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    HistoryUnavailable,
    SendFailed,
    InvalidIdentity,
}

impl ErrorKind {
    pub fn reason(&self) -> &'static str {
        match self {
            ErrorKind::HistoryUnavailable => "Failed to load chat history",
            ErrorKind::SendFailed => "Failed to send message. Please try again.",
            ErrorKind::InvalidIdentity => "Please enter a valid email address",
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Failed to load chat history: {source}")]
    HistoryUnavailable {
        #[source]
        source: ServiceError,
    },

    #[error("Failed to send message: {source}")]
    SendFailed {
        #[source]
        source: ServiceError,
    },

    #[error("Invalid email address: '{0}'")]
    InvalidIdentity(String),

    #[error("No session identity selected")]
    NoIdentity,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ChatError {
    /// Classification for the error banner; `None` for internal signals
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ChatError::HistoryUnavailable { .. } => Some(ErrorKind::HistoryUnavailable),
            ChatError::SendFailed { .. } => Some(ErrorKind::SendFailed),
            ChatError::InvalidIdentity(_) => Some(ErrorKind::InvalidIdentity),
            ChatError::NoIdentity | ChatError::Store(_) => None,
        }
    }

    pub fn is_user_facing(&self) -> bool {
        self.kind().is_some()
    }
}
