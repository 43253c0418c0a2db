//! Inbound chat request validation
//!
//! Rules run in a fixed order and the first failure wins, so nothing partial
//! is ever forwarded upstream.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::AppError,
    models::kea::{ChatMessage, ChatRequest},
};

/// Parse and validate a raw chat request body
pub fn validate_chat_request(body: &[u8]) -> Result<ChatRequest, AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| AppError::Validation("Invalid JSON".to_string()))?;

    let model = value
        .get("model")
        .and_then(Value::as_str)
        .filter(|model| !model.is_empty())
        .ok_or_else(|| {
            AppError::Validation(
                "Required field: model (deployment name) must be a non-empty string".to_string(),
            )
        })?;

    let messages = value
        .get("messages")
        .and_then(Value::as_array)
        .filter(|messages| !messages.is_empty())
        .ok_or_else(|| {
            AppError::Validation("Required field: messages[] must be a non-empty array".to_string())
        })?;

    // serde_json never produces NaN or infinity, so any number here is finite
    let max_tokens = match value.get("max_tokens") {
        Some(Value::Number(number)) => number.clone(),
        _ => {
            return Err(AppError::Validation(
                "Required field: max_tokens must be a number".to_string(),
            ))
        }
    };

    let messages = messages
        .iter()
        .enumerate()
        .map(|(idx, message)| {
            ChatMessage::deserialize(message).map_err(|e| {
                AppError::Validation(format!(
                    "messages[{}]: expected {{role: system|user|assistant, content: string}} ({})",
                    idx, e
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ChatRequest {
        model: model.to_string(),
        messages,
        max_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::kea::Role;
    use serde_json::json;

    fn validate(value: Value) -> Result<ChatRequest, AppError> {
        validate_chat_request(value.to_string().as_bytes())
    }

    fn message_of(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_request() {
        let request = validate(json!({
            "model": "my-gpt-4o",
            "max_tokens": 128,
            "messages": [
                {"role": "system", "content": "Be brief"},
                {"role": "user", "content": "Hello from Kea"}
            ]
        }))
        .unwrap();

        assert_eq!(request.model, "my-gpt-4o");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.max_tokens.as_u64(), Some(128));
    }

    #[test]
    fn test_extra_message_fields_are_dropped() {
        let request = validate(json!({
            "model": "m",
            "max_tokens": 1,
            "messages": [{"role": "user", "content": "x", "name": "bob"}]
        }))
        .unwrap();

        let forwarded = serde_json::to_value(&request.messages[0]).unwrap();
        assert_eq!(forwarded, json!({"role": "user", "content": "x"}));
    }

    #[test]
    fn test_invalid_json() {
        let err = validate_chat_request(b"{not json").unwrap_err();
        assert_eq!(message_of(err), "Invalid JSON");
    }

    #[test]
    fn test_missing_model() {
        let err = validate(json!({"messages": [{"role": "user", "content": "x"}], "max_tokens": 1}))
            .unwrap_err();
        assert!(message_of(err).contains("model"));

        let err = validate(json!({"model": "", "messages": [{"role": "user", "content": "x"}], "max_tokens": 1}))
            .unwrap_err();
        assert!(message_of(err).contains("model"));
    }

    #[test]
    fn test_empty_messages() {
        let err = validate(json!({"model": "m", "messages": [], "max_tokens": 1})).unwrap_err();
        assert!(message_of(err).contains("messages"));

        let err = validate(json!({"model": "m", "messages": "hi", "max_tokens": 1})).unwrap_err();
        assert!(message_of(err).contains("messages"));
    }

    #[test]
    fn test_max_tokens_must_be_number() {
        let err = validate(json!({"model": "m", "messages": [{"role": "user", "content": "x"}]}))
            .unwrap_err();
        assert!(message_of(err).contains("max_tokens"));

        let err = validate(json!({"model": "m", "messages": [{"role": "user", "content": "x"}], "max_tokens": "128"}))
            .unwrap_err();
        assert!(message_of(err).contains("max_tokens"));
    }

    #[test]
    fn test_rules_apply_in_order() {
        // Everything is wrong; the model rule reports first
        let err = validate(json!({"messages": [], "max_tokens": null})).unwrap_err();
        assert!(message_of(err).contains("model"));
    }

    #[test]
    fn test_malformed_message() {
        let err = validate(json!({
            "model": "m",
            "max_tokens": 1,
            "messages": [{"role": "user", "content": "ok"}, {"role": "robot", "content": "x"}]
        }))
        .unwrap_err();
        assert!(message_of(err).starts_with("messages[1]"));
    }

    #[test]
    fn test_non_object_body() {
        let err = validate(json!([1, 2, 3])).unwrap_err();
        assert!(message_of(err).contains("model"));
    }
}
