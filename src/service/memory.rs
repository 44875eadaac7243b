use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::ConversationService;
use crate::error::ServiceError;
use crate::models::{Message, MessageId, Role, SendResponse};
use crate::session::Identity;

type ReplyFn = dyn Fn(&str) -> String + Send + Sync;

/// Backend double that keeps conversations in memory.
///
/// Mirrors the real service: messages get UUID ids and server timestamps, history comes back
/// in creation order, and blank content is rejected with a 400.
pub struct InMemoryConversationService {
    conversations: Mutex<HashMap<Identity, Vec<Message>>>,
    reply: Box<ReplyFn>,
}

impl Default for InMemoryConversationService {
    fn default() -> Self {
        Self::with_reply(|content| format!("You said: {}", content))
    }
}

impl InMemoryConversationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `reply` to produce the assistant text for each user message
    pub fn with_reply(reply: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self { conversations: Mutex::new(HashMap::new()), reply: Box::new(reply) }
    }

    /// Seed history for an identity, as if it had been sent earlier
    pub fn seed(&self, identity: &Identity, messages: Vec<Message>) {
        self.lock().entry(identity.clone()).or_default().extend(messages);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Identity, Vec<Message>>> {
        self.conversations.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn server_message(role: Role, content: &str, identity: &Identity) -> Message {
        Message {
            id: MessageId::confirmed(Uuid::new_v4().to_string()),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
            email: Some(identity.as_str().to_string()),
        }
    }
}

#[async_trait]
impl ConversationService for InMemoryConversationService {
    async fn fetch_history(&self, identity: &Identity) -> Result<Vec<Message>, ServiceError> {
        Ok(self.lock().get(identity).cloned().unwrap_or_default())
    }

    async fn send_message(
        &self,
        content: &str,
        identity: &Identity,
    ) -> Result<SendResponse, ServiceError> {
        if content.trim().is_empty() {
            return Err(ServiceError::Status {
                status: 400,
                body: "Message content cannot be empty".to_string(),
            });
        }

        let user_message = Self::server_message(Role::User, content, identity);
        let ai_message = Self::server_message(Role::Assistant, &(self.reply)(content), identity);

        self.lock()
            .entry(identity.clone())
            .or_default()
            .extend([user_message.clone(), ai_message.clone()]);

        Ok(SendResponse { user_message, ai_message, status: Some("success".to_string()) })
    }
}
