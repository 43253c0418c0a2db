use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ORIGIN,
        },
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::Response,
};

const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Relay-Signature, X-Client-Version";
const MAX_AGE_SECONDS: &str = "3600";

/// Compute the CORS header set for a request origin
///
/// The origin is echoed when present, otherwise `*` is allowed.
pub fn cors_headers(origin: Option<&str>) -> HeaderMap {
    let allow_origin = origin
        .filter(|origin| !origin.is_empty())
        .and_then(|origin| HeaderValue::from_str(origin).ok())
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECONDS));
    headers
}

/// Attach CORS headers to every response, error responses included
pub async fn cors_middleware(req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .extend(cors_headers(origin.as_deref()));
    response
}

/// Answer a CORS preflight: 204, no body
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
