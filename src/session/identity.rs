use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Email-based key scoping which conversation is loaded and sent to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Normalize (trim + lowercase) and validate an email address
    pub fn parse(raw: &str) -> Result<Self, ChatError> {
        let email = raw.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ChatError::InvalidIdentity(raw.to_string()));
        }
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = ChatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identity::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}
