use crate::models::{
    azure::ChatCompletionResponse,
    kea::{AssistantMessage, ChatChoice, ChatResponse, FinishReason, Role, Usage},
};

/// Convert a (possibly partial) Azure completion into the Kea response contract
///
/// Missing content becomes `""`, missing usage counters become 0, and any
/// finish reason other than `length` becomes `stop`.
pub fn convert_response(
    azure_resp: &ChatCompletionResponse,
    model: &str,
    request_id: &str,
) -> ChatResponse {
    let first_choice = azure_resp
        .choices
        .as_ref()
        .and_then(|choices| choices.first());

    let content = first_choice
        .and_then(|choice| choice.message.as_ref())
        .and_then(|message| message.content.clone())
        .unwrap_or_default();

    let finish_reason = match first_choice.and_then(|choice| choice.finish_reason.as_deref()) {
        Some("length") => FinishReason::Length,
        _ => FinishReason::Stop,
    };

    let usage = azure_resp
        .usage
        .as_ref()
        .map(|usage| Usage {
            prompt_tokens: usage.prompt_tokens.unwrap_or(0),
            completion_tokens: usage.completion_tokens.unwrap_or(0),
            total_tokens: usage.total_tokens.unwrap_or(0),
        })
        .unwrap_or_default();

    ChatResponse {
        request_id: request_id.to_string(),
        model: model.to_string(),
        choices: vec![ChatChoice {
            index: 0,
            message: AssistantMessage {
                role: Role::Assistant,
                content,
            },
            finish_reason,
        }],
        usage,
    }
}
