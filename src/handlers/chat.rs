use crate::{config::Config, converters, error::AppError, metrics, providers, validation};
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Correlation header carrying the generated request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<arc_swap::ArcSwap<Config>>,
    pub http_client: reqwest::Client,
}

/// Handle POST /kea/v1/chat
pub async fn handle_chat(State(state): State<AppState>, body: Bytes) -> Response {
    metrics::record_request("/kea/v1/chat");

    match relay_chat(&state, &body).await {
        Ok(response) => response,
        Err(err) => {
            let status = err.status_code();
            metrics::record_error(err.error_type(), status.as_u16());
            tracing::warn!(
                error_type = err.error_type(),
                status = status.as_u16(),
                error = %err,
                "Chat request failed"
            );
            err.into_response()
        }
    }
}

async fn relay_chat(state: &AppState, body: &[u8]) -> Result<Response, AppError> {
    // Load current configuration
    let config = state.config.load();
    let target = config.relay.resolve()?;

    let request = validation::validate_chat_request(body)?;

    tracing::info!(
        model = %request.model,
        messages = request.messages.len(),
        "Handling chat request"
    );

    let start = Instant::now();
    let completion =
        providers::azure_openai::chat_completions(&state.http_client, &target, &request).await?;
    let elapsed = start.elapsed();

    let request_id = Uuid::new_v4().to_string();
    let chat_response =
        converters::azure_response::convert_response(&completion, &request.model, &request_id);

    metrics::record_tokens(&request.model, "input", chat_response.usage.prompt_tokens);
    metrics::record_tokens(&request.model, "output", chat_response.usage.completion_tokens);
    metrics::record_duration(&request.model, elapsed);

    tracing::info!(
        request_id = %request_id,
        model = %request.model,
        duration_ms = elapsed.as_millis(),
        prompt_tokens = chat_response.usage.prompt_tokens,
        completion_tokens = chat_response.usage.completion_tokens,
        finish_reason = ?chat_response.choices[0].finish_reason,
        "Completed chat request"
    );

    let mut response = Json(chat_response).into_response();
    let header_value = HeaderValue::from_str(&request_id)
        .map_err(|e| AppError::Internal(format!("Invalid request id header: {}", e)))?;
    response.headers_mut().insert(REQUEST_ID_HEADER, header_value);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn create_test_state(config: Config) -> AppState {
        AppState {
            config: Arc::new(arc_swap::ArcSwap::from_pointee(config)),
            http_client: reqwest::Client::new(),
        }
    }

    #[tokio::test]
    async fn test_misconfigured_relay_returns_500() {
        let state = create_test_state(Config::default());
        let response = handle_chat(
            State(state),
            Bytes::from_static(br#"{"model":"m","messages":[{"role":"user","content":"x"}],"max_tokens":1}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_configuration_checked_before_body() {
        let state = create_test_state(Config::default());
        let response = handle_chat(State(state), Bytes::from_static(b"not json")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_body_returns_400() {
        let mut config = Config::default();
        config.relay.endpoint = "https://kea.openai.azure.com".to_string();
        config.relay.api_version = "2024-06-01".to_string();
        config.relay.api_key = "secret".to_string();

        let state = create_test_state(config);
        let response = handle_chat(State(state), Bytes::from_static(b"not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
