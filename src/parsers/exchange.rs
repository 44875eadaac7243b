use crate::error::ServiceError;
use crate::models::{Role, SendResponse};

/// Parse the body of `POST /api/messages`.
///
/// The pair must be exactly one user message followed by one assistant message with
/// distinct ids; anything else is rejected before it can reach the store.
pub fn parse_send_response(body: &str) -> Result<SendResponse, ServiceError> {
    let response: SendResponse = serde_json::from_str(body)
        .map_err(|e| ServiceError::Decode(format!("invalid send response: {}", e)))?;
    validate_send_response(&response)?;
    Ok(response)
}

pub fn validate_send_response(response: &SendResponse) -> Result<(), ServiceError> {
    if response.user_message.role != Role::User {
        return Err(ServiceError::Decode(format!(
            "user_message has role '{}'",
            response.user_message.role
        )));
    }
    if response.ai_message.role != Role::Assistant {
        return Err(ServiceError::Decode(format!(
            "ai_message has role '{}'",
            response.ai_message.role
        )));
    }
    if response.user_message.id == response.ai_message.id {
        return Err(ServiceError::Decode(format!(
            "user_message and ai_message share id {}",
            response.user_message.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageId;

    #[test]
    fn test_parse_send_response() {
        let body = r#"{
            "user_message": {"id":"u1","role":"user","content":"hi","email":"a@example.com","created_at":"2024-03-15T09:00:00Z"},
            "ai_message": {"id":"a1","role":"assistant","content":"hello","email":"a@example.com","created_at":"2024-03-15T09:00:02Z"},
            "status": "success"
        }"#;

        let response = parse_send_response(body).unwrap();
        assert_eq!(response.user_message.id, MessageId::confirmed("u1"));
        assert_eq!(response.ai_message.content, "hello");
        assert_eq!(response.status.as_deref(), Some("success"));
    }

    #[test]
    fn test_parse_send_response_rejects_swapped_roles() {
        let body = r#"{
            "user_message": {"id":"u1","role":"assistant","content":"hi","created_at":"2024-03-15T09:00:00Z"},
            "ai_message": {"id":"a1","role":"user","content":"hello","created_at":"2024-03-15T09:00:02Z"}
        }"#;

        let err = parse_send_response(body).unwrap_err();
        assert!(err.to_string().contains("user_message has role 'assistant'"));
    }

    #[test]
    fn test_parse_send_response_rejects_shared_id() {
        let body = r#"{
            "user_message": {"id":"x","role":"user","content":"hi","created_at":"2024-03-15T09:00:00Z"},
            "ai_message": {"id":"x","role":"assistant","content":"hello","created_at":"2024-03-15T09:00:02Z"}
        }"#;

        assert!(parse_send_response(body).is_err());
    }

    #[test]
    fn test_parse_send_response_missing_ai_message() {
        let body = r#"{"user_message": {"id":"u","role":"user","content":"hi","created_at":"2024-03-15T09:00:00Z"}}"#;
        assert!(matches!(parse_send_response(body), Err(ServiceError::Decode(_))));
    }
}
