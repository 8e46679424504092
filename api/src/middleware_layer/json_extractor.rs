use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    for key in [
        "filters", "raw_where", "mode", "query", "metadata", "content", "host", "port", "name",
    ] {
        if msg.contains(key) {
            return Some(key.to_string());
        }
    }
    None
}

/// Tags the response with an `X-Request-Id` unless it already carries one.
fn ensure_request_id(parts: &mut axum::http::response::Parts) {
    let present = parts
        .headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty());
    if present {
        return;
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    if let Ok(v) = HeaderValue::from_str(&format!("req-{nanos}")) {
        parts.headers.insert("X-Request-Id", v);
    }
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Wraps plain-text 400/422 rejections (bad path segments, bad bodies) in the
/// JSON envelope. Responses that are already JSON pass through untouched.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    if is_json(&parts) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    ensure_request_id(&mut parts);

    let detail = ApiErrorDetail {
        path: guess_path_from_serde_msg(&original),
        hint: if original.contains("expected a sequence") {
            Some("Expected an array for this field (e.g. [{\"field\": \"k\", \"operator\": \"equals\", \"value\": \"v\"}]).".into())
        } else if original.contains("expected a map") || original.contains("expected struct") {
            Some("Expected a JSON object here (e.g. { \"field\": \"value\" }).".into())
        } else if original.contains("unknown variant") {
            Some("mode must be one of: text, semantic, regex, id, metadata.".into())
        } else {
            None
        },
    };

    let envelope = ApiResponse::<()>::error(
        if status == StatusCode::BAD_REQUEST {
            "BAD_REQUEST"
        } else {
            "UNPROCESSABLE_ENTITY"
        },
        original.trim(),
        vec![detail],
    );

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_guess_picks_known_field() {
        assert_eq!(
            guess_path_from_serde_msg("filters[0].operator: unknown variant `like`"),
            Some("filters".into())
        );
        assert_eq!(guess_path_from_serde_msg("EOF while parsing"), None);
    }

    #[test]
    fn request_id_is_added_once() {
        let (mut parts, _) = axum::http::Response::new(()).into_parts();
        ensure_request_id(&mut parts);
        let first = parts.headers.get("X-Request-Id").cloned().unwrap();
        assert!(first.to_str().unwrap().starts_with("req-"));

        ensure_request_id(&mut parts);
        assert_eq!(parts.headers.get("X-Request-Id"), Some(&first));
    }
}
