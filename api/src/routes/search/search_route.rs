use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use explorer_core::SearchRequest;
use tracing::{debug, error};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::request_id,
};

/// POST /api/collections/{name}/search
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/collections/docs/search \
///   -H 'content-type: application/json' \
///   -d '{"mode":"metadata","filters":[{"field":"category","operator":"equals","value":"greeting"}]}'
/// ```
pub async fn search_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(p) = payload?;
    let request_id = request_id(&headers);

    debug!(
        request_id = %request_id,
        collection = %name,
        mode = ?p.mode,
        page = p.page,
        "search_route: start"
    );

    let session = state.sessions.require().await?;

    match session.search(&name, &p).await {
        Ok(page) => {
            debug!(
                request_id = %request_id,
                hits = page.results.len(),
                total = page.total,
                "search_route: success"
            );
            Ok(ApiResponse::success(page).into_response_with_status(StatusCode::OK))
        }
        Err(err) => {
            error!(request_id = %request_id, error = %err, "search_route: search failed");
            Err(AppError::from(err))
        }
    }
}
