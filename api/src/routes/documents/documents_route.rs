//! Document CRUD under `/api/collections/{name}/documents`.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use explorer_core::{DocumentPatch, NewDocument};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::{
        documents::document_request::{AddedDocument, DeletedDocument},
        request_id,
    },
};

/// POST /api/collections/{name}/documents
pub async fn add_document_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
    payload: Result<Json<NewDocument>, JsonRejection>,
) -> AppResult<Response> {
    let Json(doc) = payload?;
    debug!(request_id = %request_id(&headers), collection = %name, "add_document_route: start");

    let session = state.sessions.require().await?;
    let id = session.add_document(&name, doc).await?;
    Ok(ApiResponse::success(AddedDocument { id }).into_response_with_status(StatusCode::CREATED))
}

/// GET /api/collections/{name}/documents/{id}
pub async fn get_document_route(
    State(state): State<Arc<AppState>>,
    Path((name, id)): Path<(String, String)>,
) -> AppResult<Response> {
    let session = state.sessions.require().await?;
    let doc = session.get_document(&name, &id).await?;
    Ok(ApiResponse::success(doc).into_response_with_status(StatusCode::OK))
}

/// PUT /api/collections/{name}/documents/{id}
pub async fn update_document_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((name, id)): Path<(String, String)>,
    payload: Result<Json<DocumentPatch>, JsonRejection>,
) -> AppResult<Response> {
    let Json(patch) = payload?;
    debug!(request_id = %request_id(&headers), collection = %name, %id, "update_document_route: start");

    let session = state.sessions.require().await?;
    session.update_document(&name, &id, patch).await?;
    let doc = session.get_document(&name, &id).await?;
    Ok(ApiResponse::success(doc).into_response_with_status(StatusCode::OK))
}

/// DELETE /api/collections/{name}/documents/{id}
pub async fn delete_document_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((name, id)): Path<(String, String)>,
) -> AppResult<Response> {
    debug!(request_id = %request_id(&headers), collection = %name, %id, "delete_document_route: start");

    let session = state.sessions.require().await?;
    session.delete_documents(&name, std::slice::from_ref(&id)).await?;
    Ok(ApiResponse::success(DeletedDocument { deleted: id }).into_response_with_status(StatusCode::OK))
}
