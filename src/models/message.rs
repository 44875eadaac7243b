use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::session::Identity;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message identifier, tagged with the namespace it was issued from.
///
/// Provisional ids are generated locally and live only until the send settles.
/// Confirmed ids come from the service and are stable across reloads. Ids from the
/// two namespaces never compare equal, even when their text matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    Provisional(String),
    Confirmed(String),
}

impl MessageId {
    pub fn confirmed(id: impl Into<String>) -> Self {
        MessageId::Confirmed(id.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageId::Provisional(id) | MessageId::Confirmed(id) => id,
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, MessageId::Provisional(_))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MessageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_message_id")]
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Message {
    /// Build the locally-created user message shown while a send is in flight
    pub fn provisional(
        id: MessageId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        identity: &Identity,
    ) -> Self {
        debug_assert!(id.is_provisional(), "provisional message built with confirmed id {id}");
        Self {
            id,
            role: Role::User,
            content: content.into(),
            created_at,
            email: Some(identity.as_str().to_string()),
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.id.is_provisional()
    }
}
