use crate::{
    config::UpstreamTarget,
    converters::kea_to_azure,
    error::AppError,
    models::{
        azure::{ChatCompletionResponse, ErrorResponse},
        kea::ChatRequest,
    },
};
use axum::http::StatusCode;
use reqwest::Client;
use url::Url;

/// Build the chat completions URL for a deployment
///
/// URL pattern: `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={api_version}`
/// The deployment is escaped as a single path segment.
pub fn chat_completions_url(target: &UpstreamTarget, deployment: &str) -> Result<Url, AppError> {
    let mut url = target.base_url.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::Config("AOAI_ENDPOINT cannot be used as a base URL".to_string()))?
        .pop_if_empty()
        .extend(["openai", "deployments", deployment, "chat", "completions"]);
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair("api-version", &target.api_version);
    Ok(url)
}

/// Call the Azure OpenAI chat completions API once
///
/// The whole exchange (send and body read) races the configured deadline.
/// When the deadline wins, the in-flight request future is dropped, which
/// aborts the connection attempt and releases the timer.
pub async fn chat_completions(
    client: &Client,
    target: &UpstreamTarget,
    request: &ChatRequest,
) -> Result<ChatCompletionResponse, AppError> {
    let url = chat_completions_url(target, &request.model)?;
    let payload = kea_to_azure::convert_request(request);

    let exchange = async {
        let response = client
            .post(url)
            .header("Content-Type", "application/json")
            .header("api-key", &target.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok::<_, reqwest::Error>((status, body))
    };

    let (status, body) = match tokio::time::timeout(target.timeout, exchange).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(AppError::Timeout(format!(
                "Upstream did not respond within {} ms",
                target.timeout.as_millis()
            )))
        }
    };

    if !status.is_success() {
        return Err(AppError::Upstream {
            status,
            message: extract_error_message(status, &body),
        });
    }

    Ok(ChatCompletionResponse::from_body(&body))
}

/// Pick the most useful message from an upstream error body
///
/// `error.message` when present, then the raw body, then `HTTP <code>`.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();

    parsed
        .error
        .and_then(|error| error.message)
        .filter(|message| !message.is_empty())
        .or_else(|| (!body.is_empty()).then(|| body.to_string()))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
