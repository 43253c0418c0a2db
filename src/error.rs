use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types
///
/// Every variant renders as a plain-text body so browser clients can read the
/// message directly. CORS headers are attached by the middleware, not here.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid relay settings
    #[error("Configuration error: {0}")]
    Config(String),
    /// Malformed client input
    #[error("Validation error: {0}")]
    Validation(String),
    /// Upstream did not answer before the deadline
    #[error("Upstream timeout: {0}")]
    Timeout(String),
    /// Upstream answered with a non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },
    /// Transport failure talking to upstream (connect, DNS, TLS, body read)
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status the error maps to at the boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream { status, .. } => *status,
            Self::HttpRequest(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::HttpRequest(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used in logs and metrics
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Validation(_) => "validation_error",
            Self::Timeout(_) => "timeout",
            Self::Upstream { .. } => "upstream_error",
            Self::HttpRequest(_) => "transport_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Message written as the response body
    fn body(&self) -> String {
        match self {
            Self::Config(msg)
            | Self::Validation(msg)
            | Self::Timeout(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Upstream { message, .. } => message.clone(),
            Self::HttpRequest(err) => err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.body(),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::Validation("Invalid JSON".to_string());
        assert_eq!(error.to_string(), "Validation error: Invalid JSON");
    }

    #[test]
    fn test_error_type() {
        assert_eq!(AppError::Config("x".to_string()).error_type(), "config_error");
        assert_eq!(AppError::Timeout("x".to_string()).error_type(), "timeout");
        assert_eq!(
            AppError::Upstream {
                status: StatusCode::TOO_MANY_REQUESTS,
                message: "x".to_string(),
            }
            .error_type(),
            "upstream_error"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Config("missing".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Validation("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Timeout("slow".to_string()).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[tokio::test]
    async fn test_upstream_error_passes_status_and_message_through() {
        let error = AppError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "rate limited".to_string(),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"rate limited");
    }
}
