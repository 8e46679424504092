//! GET /api/heartbeat: proxies the configured Chroma server's heartbeat.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, warn};

use crate::core::app_state::AppState;

/// Returns the upstream body verbatim with 200, or a fixed error body with 500.
///
/// Unlike the rest of the API this endpoint is not wrapped in the envelope;
/// front ends poll it and read the upstream payload directly.
pub async fn heartbeat_route(State(state): State<Arc<AppState>>) -> Response {
    match state.upstream.heartbeat().await {
        Ok(body) => {
            debug!(upstream = %state.upstream.endpoint(), "heartbeat ok");
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            warn!(upstream = %state.upstream.endpoint(), error = %err, "heartbeat failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to connect to ChromaDB" })),
            )
                .into_response()
        }
    }
}
