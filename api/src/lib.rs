use std::sync::Arc;

pub mod core;
pub mod error_handler;
pub mod telemetry;

mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::{AppConfig, AppState},
    error_handler::AppError,
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        collections::collections_route::{
            collection_schema_route, create_collection_route, delete_collection_route,
            get_collection_route, list_collections_route,
        },
        connection::connection_route::{connect_route, connection_status_route, disconnect_route},
        documents::documents_route::{
            add_document_route, delete_document_route, get_document_route, update_document_route,
        },
        heartbeat::heartbeat_route::heartbeat_route,
        search::search_route::search_route,
    },
};

/// Builds the HTTP surface over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/heartbeat", get(heartbeat_route))
        .route(
            "/api/connection",
            get(connection_status_route)
                .post(connect_route)
                .delete(disconnect_route),
        )
        .route(
            "/api/collections",
            get(list_collections_route).post(create_collection_route),
        )
        .route(
            "/api/collections/{name}",
            get(get_collection_route).delete(delete_collection_route),
        )
        .route("/api/collections/{name}/schema", get(collection_schema_route))
        .route("/api/collections/{name}/search", post(search_route))
        .route("/api/collections/{name}/documents", post(add_document_route))
        .route(
            "/api/collections/{name}/documents/{id}",
            get(get_document_route)
                .put(update_document_route)
                .delete(delete_document_route),
        )
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Binds `config.address` and serves until Ctrl+C.
pub async fn start(config: AppConfig) -> Result<(), AppError> {
    let address = config.address.clone();
    let state = Arc::new(AppState::new(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_client::ChromaConfig;
    use explorer_core::EmbeddingConfig;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COLLECTIONS: &str =
        "/api/v2/tenants/default_tenant/databases/default_database/collections";

    /// Serves the router on an ephemeral port; returns its base URL.
    async fn spawn_api(upstream: &str) -> String {
        let config = AppConfig {
            address: "127.0.0.1:0".into(),
            chroma: ChromaConfig::new(upstream).with_timeout_secs(2),
            embedding: EmbeddingConfig::default(),
        };
        let state = Arc::new(AppState::new(config).unwrap());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(state)).await });
        format!("http://{addr}")
    }

    async fn chroma_up(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v2/heartbeat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "nanosecond heartbeat": 7 })),
            )
            .mount(server)
            .await;
    }

    async fn connect(http: &reqwest::Client, api: &str, server: &MockServer) {
        let addr = server.address();
        let resp = http
            .post(format!("{api}/api/connection"))
            .json(&json!({ "name": "local", "host": addr.ip().to_string(), "port": addr.port() }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn heartbeat_proxies_upstream_body() {
        let server = MockServer::start().await;
        chroma_up(&server).await;
        let api = spawn_api(&server.uri()).await;

        let resp = reqwest::get(format!("{api}/api/heartbeat")).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "nanosecond heartbeat": 7 }));
    }

    #[tokio::test]
    async fn heartbeat_failure_is_500_with_fixed_body() {
        let api = spawn_api("http://127.0.0.1:1").await;

        let resp = reqwest::get(format!("{api}/api/heartbeat")).await.unwrap();
        assert_eq!(resp.status(), 500);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Failed to connect to ChromaDB" }));
    }

    #[tokio::test]
    async fn operations_need_a_connection() {
        let server = MockServer::start().await;
        let api = spawn_api(&server.uri()).await;

        let resp = reqwest::get(format!("{api}/api/collections")).await.unwrap();
        assert_eq!(resp.status(), 409);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("NOT_CONNECTED"));
    }

    #[tokio::test]
    async fn connect_then_list_collections() {
        let server = MockServer::start().await;
        chroma_up(&server).await;
        Mock::given(method("GET"))
            .and(path(COLLECTIONS))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "id": "c-1", "name": "docs" }])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{COLLECTIONS}/c-1/count")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(4)))
            .mount(&server)
            .await;

        let api = spawn_api(&server.uri()).await;
        let http = reqwest::Client::new();
        connect(&http, &api, &server).await;

        let status: Value = http
            .get(format!("{api}/api/connection"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(status["data"]["connected"], json!(true));
        assert_eq!(status["data"]["connection"]["name"], json!("local"));

        let body: Value = http
            .get(format!("{api}/api/collections"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"][0]["name"], json!("docs"));
        assert_eq!(body["data"][0]["count"], json!(4));

        let resp = http
            .delete(format!("{api}/api/connection"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let resp = http
            .get(format!("{api}/api/collections"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 409);
    }

    #[tokio::test]
    async fn failed_connect_is_bad_gateway() {
        let server = MockServer::start().await;
        let api = spawn_api(&server.uri()).await;

        let resp = reqwest::Client::new()
            .post(format!("{api}/api/connection"))
            .json(&json!({ "host": "127.0.0.1", "port": 1 }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 502);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], json!("CONNECTION_FAILED"));
    }

    #[tokio::test]
    async fn malformed_filter_and_bad_body_are_400_envelopes() {
        let server = MockServer::start().await;
        chroma_up(&server).await;
        let api = spawn_api(&server.uri()).await;
        let http = reqwest::Client::new();
        connect(&http, &api, &server).await;

        let resp = http
            .post(format!("{api}/api/collections/docs/search"))
            .json(&json!({ "raw_where": "{not json" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], json!("MALFORMED_FILTER"));

        let resp = http
            .post(format!("{api}/api/collections/docs/search"))
            .header("content-type", "application/json")
            .body(r#"{"mode": "fuzzy"}"#)
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], json!(false));
    }
}
