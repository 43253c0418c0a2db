use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::handlers::chat::AppState;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "kea-relay",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check endpoint
/// Ready only when the relay settings resolve, so chat requests can succeed
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config.load();

    match config.relay.resolve() {
        Ok(_) => (StatusCode::OK, Json(json!({
            "status": "ready",
            "service": "kea-relay",
        }))),
        Err(err) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
            "status": "not_ready",
            "service": "kea-relay",
            "reason": err.to_string(),
        }))),
    }
}
