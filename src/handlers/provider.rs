use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    handlers::{chat::AppState, manifest::PROVIDER_ID},
    models::kea::ProviderInfo,
};

pub const PROVIDER_NAME: &str = "Azure OpenAI Relay";

/// Handle GET /kea/v1/provider
pub async fn get_provider(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config.load();

    Json(ProviderInfo {
        provider_id: PROVIDER_ID.to_string(),
        name: PROVIDER_NAME.to_string(),
        version: config.manifest.version.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_provider_info() {
        let mut config = Config::default();
        config.manifest.version = "3".to_string();
        let state = AppState {
            config: Arc::new(arc_swap::ArcSwap::from_pointee(config)),
            http_client: reqwest::Client::new(),
        };

        let response = get_provider(State(state)).await.into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let info: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            info,
            serde_json::json!({
                "providerId": "azure_openai",
                "name": "Azure OpenAI Relay",
                "version": "3"
            })
        );
    }
}
