use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{debug, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::{
        connection::connection_request::{ConnectRequest, ConnectionStatus},
        request_id,
    },
};

/// GET /api/connection
pub async fn connection_status_route(State(state): State<Arc<AppState>>) -> Response {
    let connection = state.sessions.connection().await;
    ApiResponse::success(ConnectionStatus {
        connected: connection.as_ref().is_some_and(|c| c.connected),
        connection,
    })
    .into_response_with_status(StatusCode::OK)
}

/// POST /api/connection
pub async fn connect_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ConnectRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(p) = payload?;
    debug!(
        request_id = %request_id(&headers),
        host = %p.host,
        port = p.port,
        "connect_route: start"
    );

    let connection = state.sessions.connect(&p.name, &p.host, p.port).await?;

    Ok(ApiResponse::success(ConnectionStatus {
        connected: true,
        connection: Some(connection),
    })
    .into_response_with_status(StatusCode::OK))
}

/// DELETE /api/connection
pub async fn disconnect_route(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    state.sessions.disconnect().await;
    info!(request_id = %request_id(&headers), "disconnect_route: done");

    ApiResponse::success(ConnectionStatus {
        connected: false,
        connection: None,
    })
    .into_response_with_status(StatusCode::OK)
}
