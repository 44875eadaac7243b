//! Conversation service boundary.
//!
//! The sync engine only knows the two request/response calls below. Implementations:
//!
//! - [`HttpConversationService`] - talks to the real backend over HTTP
//! - [`InMemoryConversationService`] - stands in for the backend in offline runs and tests

pub mod http;
pub mod memory;

use async_trait::async_trait;

pub use http::HttpConversationService;
pub use memory::InMemoryConversationService;

use crate::error::ServiceError;
use crate::models::{Message, SendResponse};
use crate::session::Identity;

#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Full ordered history for `identity`
    async fn fetch_history(&self, identity: &Identity) -> Result<Vec<Message>, ServiceError>;

    /// Store a user message and return the confirmed user/assistant pair
    async fn send_message(
        &self,
        content: &str,
        identity: &Identity,
    ) -> Result<SendResponse, ServiceError>;
}
