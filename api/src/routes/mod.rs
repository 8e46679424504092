use axum::http::HeaderMap;

pub mod collections;
pub mod connection;
pub mod documents;
pub mod heartbeat;
pub mod search;

/// Caller-supplied `X-Request-Id`, or "-".
pub(crate) fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}
