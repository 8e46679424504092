//! Shared wiremock fixtures for the crate's tests.

use chroma_client::ChromaConfig;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::embedding::Embedder;
use crate::session::{Session, SessionManager};

pub const COLLECTIONS: &str =
    "/api/v2/tenants/default_tenant/databases/default_database/collections";

pub fn manager() -> SessionManager {
    SessionManager::new(
        ChromaConfig::default().with_timeout_secs(2),
        Embedder::default(),
    )
}

/// Answers the heartbeat so that `connect` succeeds.
pub async fn chroma_up(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/heartbeat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "nanosecond heartbeat": 1 })),
        )
        .mount(server)
        .await;
}

/// A manager connected to `server`, plus its live session.
pub async fn connected(server: &MockServer) -> (SessionManager, Session) {
    chroma_up(server).await;
    let sessions = manager();
    let addr = server.address();
    sessions
        .connect("test", &addr.ip().to_string(), addr.port())
        .await
        .unwrap();
    let session = sessions.require().await.unwrap();
    (sessions, session)
}

pub async fn mount_collection(server: &MockServer, name: &str, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{COLLECTIONS}/{name}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": id, "name": name })),
        )
        .mount(server)
        .await;
}

pub async fn mount_count(server: &MockServer, id: &str, count: usize) {
    Mock::given(method("GET"))
        .and(path(format!("{COLLECTIONS}/{id}/count")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(count)))
        .mount(server)
        .await;
}
