use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use super::ConversationService;
use crate::config::ClientConfig;
use crate::error::ServiceError;
use crate::models::{Message, SendRequest, SendResponse};
use crate::parsers::{parse_history_payload, parse_send_response};
use crate::session::Identity;

const MESSAGES_PATH: &str = "/api/messages";

/// `reqwest`-backed client for the conversation backend
pub struct HttpConversationService {
    client: Client,
    base_url: String,
}

impl HttpConversationService {
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self { client, base_url: config.base_url().to_string() })
    }

    pub fn messages_url(&self) -> String {
        format!("{}{}", self.base_url, MESSAGES_PATH)
    }

    /// Read the body of a 2xx response, or turn anything else into `ServiceError::Status`
    async fn success_body(response: Response) -> Result<String, ServiceError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Status { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

#[async_trait]
impl ConversationService for HttpConversationService {
    async fn fetch_history(&self, identity: &Identity) -> Result<Vec<Message>, ServiceError> {
        debug!(identity = %identity, "GET {}", MESSAGES_PATH);
        let response = self
            .client
            .get(self.messages_url())
            .query(&[("email", identity.as_str())])
            .send()
            .await?;

        let body = Self::success_body(response).await?;
        parse_history_payload(&body)
    }

    async fn send_message(
        &self,
        content: &str,
        identity: &Identity,
    ) -> Result<SendResponse, ServiceError> {
        debug!(identity = %identity, "POST {}", MESSAGES_PATH);
        let request =
            SendRequest { content: content.to_string(), email: identity.as_str().to_string() };
        let response = self.client.post(self.messages_url()).json(&request).send().await?;

        let body = Self::success_body(response).await?;
        parse_send_response(&body)
    }
}
