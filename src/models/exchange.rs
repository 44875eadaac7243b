use serde::{Deserialize, Serialize};

use super::Message;

/// Body of `POST /api/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub content: String,
    pub email: String,
}

/// Confirmed turn pair returned by the send endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    pub user_message: Message,
    pub ai_message: Message,
    #[serde(default)]
    pub status: Option<String>,
}
