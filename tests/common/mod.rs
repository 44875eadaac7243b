//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chat_sync::models::SendResponse;
use chat_sync::service::InMemoryConversationService;
use chat_sync::session::Identity;
use chat_sync::{ConversationService, Message, MessageId, Role, ServiceError};
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::oneshot;

/// Builder for server-side messages
pub struct MessageBuilder {
    id: String,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
    email: Option<String>,
}

impl MessageBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            role: Role::User,
            content: "Test message".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(),
            email: None,
        }
    }

    pub fn assistant(mut self) -> Self {
        self.role = Role::Assistant;
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn build(self) -> Message {
        Message {
            id: MessageId::confirmed(self.id),
            role: self.role,
            content: self.content,
            created_at: self.created_at,
            email: self.email,
        }
    }

    /// Wire form, as the history endpoint returns it
    pub fn to_json(&self) -> String {
        let mut value = serde_json::json!({
            "id": self.id,
            "role": self.role.as_str(),
            "content": self.content,
            "created_at": self.created_at.to_rfc3339(),
        });
        if let Some(email) = &self.email {
            value["email"] = serde_json::json!(email);
        }
        value.to_string()
    }
}

pub fn identity(email: &str) -> Identity {
    Identity::parse(email).expect("valid test email")
}

/// Conversation service whose responses are released by the test.
///
/// Sends whose content has a gate block until the returned sender fires (or is dropped), so
/// tests decide the order in which completions reach the session.
pub struct GatedService {
    inner: InMemoryConversationService,
    send_gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    history_gate: Mutex<Option<oneshot::Receiver<()>>>,
    failing_sends: Mutex<HashSet<String>>,
    failing_history: Mutex<bool>,
}

impl GatedService {
    pub fn new() -> Self {
        Self {
            inner: InMemoryConversationService::with_reply(|c| format!("re: {}", c)),
            send_gates: Mutex::new(HashMap::new()),
            history_gate: Mutex::new(None),
            failing_sends: Mutex::new(HashSet::new()),
            failing_history: Mutex::new(false),
        }
    }

    /// Hold the next send of `content` until the returned sender fires
    pub fn gate_send(&self, content: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.send_gates.lock().unwrap().insert(content.to_string(), rx);
        tx
    }

    /// Hold the next history fetch until the returned sender fires
    pub fn gate_history(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.history_gate.lock().unwrap() = Some(rx);
        tx
    }

    /// Make sends of `content` fail with a network error
    pub fn fail_send(&self, content: &str) {
        self.failing_sends.lock().unwrap().insert(content.to_string());
    }

    pub fn fail_history(&self, fail: bool) {
        *self.failing_history.lock().unwrap() = fail;
    }

    pub fn seed(&self, identity: &Identity, messages: Vec<Message>) {
        self.inner.seed(identity, messages);
    }

    /// What the backend holds for `identity`, regardless of gates
    pub async fn stored(&self, identity: &Identity) -> Vec<Message> {
        self.inner.fetch_history(identity).await.unwrap()
    }
}

impl Default for GatedService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationService for GatedService {
    async fn fetch_history(&self, identity: &Identity) -> Result<Vec<Message>, ServiceError> {
        let gate = self.history_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if *self.failing_history.lock().unwrap() {
            return Err(ServiceError::Status { status: 500, body: "history down".to_string() });
        }
        self.inner.fetch_history(identity).await
    }

    async fn send_message(
        &self,
        content: &str,
        identity: &Identity,
    ) -> Result<SendResponse, ServiceError> {
        let gate = self.send_gates.lock().unwrap().remove(content);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.failing_sends.lock().unwrap().contains(content) {
            return Err(ServiceError::Network("connection reset".to_string()));
        }
        self.inner.send_message(content, identity).await
    }
}

/// Yield to the runtime until `condition` holds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
