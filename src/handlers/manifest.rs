use axum::{extract::State, response::IntoResponse, Json};

use crate::{error::AppError, handlers::chat::AppState, models::kea::ManifestResponse};

pub const PROVIDER_ID: &str = "azure_openai";
pub const MANIFEST_NAME: &str = "Exchange Relay";

/// Handle GET /kea/v1/manifest
/// Lists configured deployments sorted by display name
pub async fn get_manifest(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let config = state.config.load();
    let deployments = config.manifest.deployments()?;

    Ok(Json(ManifestResponse {
        provider_id: PROVIDER_ID.to_string(),
        name: MANIFEST_NAME.to_string(),
        version: config.manifest.version.clone(),
        deployments,
    }))
}
