use crate::models::{azure::ChatCompletionRequest, kea::ChatRequest};

/// Convert a Kea chat request into the Azure request body
///
/// Only `messages` and `max_tokens` travel; the deployment is part of the URL.
pub fn convert_request(request: &ChatRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        messages: request.messages.clone(),
        max_tokens: request.max_tokens.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::kea::{ChatMessage, Role};

    #[test]
    fn test_payload_has_no_model_field() {
        let request = ChatRequest {
            model: "my-gpt-4o".to_string(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: "Hello from Kea".to_string(),
            }],
            max_tokens: serde_json::Number::from(128),
        };

        let payload = serde_json::to_value(convert_request(&request)).unwrap();
        let object = payload.as_object().unwrap();

        assert!(!object.contains_key("model"));
        assert_eq!(object.len(), 2);
        assert_eq!(payload["max_tokens"], 128);
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "Hello from Kea");
    }
}
