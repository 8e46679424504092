use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::{
        collections::collection_request::{CreateCollectionRequest, DeletedCollection},
        request_id,
    },
};

/// GET /api/collections
pub async fn list_collections_route(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let session = state.sessions.require().await?;
    let collections = session.list_collections().await?;
    Ok(ApiResponse::success(collections).into_response_with_status(StatusCode::OK))
}

/// POST /api/collections
pub async fn create_collection_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateCollectionRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(p) = payload?;
    debug!(request_id = %request_id(&headers), name = %p.name, "create_collection_route: start");

    let session = state.sessions.require().await?;
    let collection = session.create_collection(&p.name, p.metadata).await?;
    Ok(ApiResponse::success(collection).into_response_with_status(StatusCode::CREATED))
}

/// GET /api/collections/{name}
pub async fn get_collection_route(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> AppResult<Response> {
    let session = state.sessions.require().await?;
    let collection = session.get_collection(&name).await?;
    Ok(ApiResponse::success(collection).into_response_with_status(StatusCode::OK))
}

/// DELETE /api/collections/{name}
pub async fn delete_collection_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> AppResult<Response> {
    debug!(request_id = %request_id(&headers), %name, "delete_collection_route: start");
    let session = state.sessions.require().await?;
    session.delete_collection(&name).await?;
    Ok(ApiResponse::success(DeletedCollection { deleted: name })
        .into_response_with_status(StatusCode::OK))
}

/// GET /api/collections/{name}/schema
pub async fn collection_schema_route(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> AppResult<Response> {
    let session = state.sessions.require().await?;
    let schema = session.collection_schema(&name).await?;
    Ok(ApiResponse::success(schema).into_response_with_status(StatusCode::OK))
}
