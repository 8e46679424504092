//! Thin async client for the Chroma HTTP API (v2).
//!
//! Endpoints used:
//! - `GET    /api/v2/heartbeat`
//! - `GET    /api/v2/tenants/{t}/databases/{d}/collections`
//! - `POST   /api/v2/tenants/{t}/databases/{d}/collections`
//! - `GET    /api/v2/tenants/{t}/databases/{d}/collections/{name}`
//! - `DELETE /api/v2/tenants/{t}/databases/{d}/collections/{name}`
//! - `GET    .../collections/{id}/count`
//! - `POST   .../collections/{id}/{get|query|add|update|delete}`
//!
//! Every call is a single attempt. Non-2xx answers become
//! [`ChromaError::HttpStatus`] with a short body snippet.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::config::chroma_config::{ChromaConfig, DEFAULT_TIMEOUT_SECS};
use crate::error_handler::{ChromaError, Result, make_snippet};
use crate::models::CollectionRecord;
use crate::wire::{
    AddRequest, CreateCollectionRequest, DeleteRequest, GetRequest, GetResponse, QueryRequest,
    QueryResponse, UpdateRequest,
};

/// Client bound to one Chroma server, tenant and database.
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct ChromaClient {
    client: reqwest::Client,
    base: String,
    /// `{base}/api/v2/tenants/{t}/databases/{d}/collections`, segments encoded.
    collections: Url,
}

impl ChromaClient {
    /// Creates a new client from the given config.
    ///
    /// # Errors
    /// - [`ChromaError::InvalidEndpoint`] if `cfg.endpoint` is empty, lacks http/https or is not a URL
    /// - [`ChromaError::InvalidName`] if tenant or database is not a usable path segment
    /// - [`ChromaError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: ChromaConfig) -> Result<Self> {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ChromaError::InvalidEndpoint(cfg.endpoint));
        }
        let base = endpoint.trim_end_matches('/').to_string();

        let mut collections =
            Url::parse(&base).map_err(|e| ChromaError::InvalidEndpoint(format!("{base}: {e}")))?;
        collections
            .path_segments_mut()
            .map_err(|_| ChromaError::InvalidEndpoint(base.clone()))?
            .pop_if_empty()
            .extend([
                "api",
                "v2",
                "tenants",
                path_segment(&cfg.tenant)?,
                "databases",
                path_segment(&cfg.database)?,
                "collections",
            ]);

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        debug!(endpoint = %base, tenant = %cfg.tenant, database = %cfg.database, "ChromaClient initialized");

        Ok(Self {
            client,
            base,
            collections,
        })
    }

    /// Returns the normalized base URL (no trailing slash).
    pub fn endpoint(&self) -> &str {
        &self.base
    }

    fn collections_url(&self) -> String {
        self.collections.to_string()
    }

    /// Appends `tail` to the collections URL, each element as one encoded segment.
    fn collection_url(&self, tail: &[&str]) -> Result<String> {
        let mut url = self.collections.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ChromaError::InvalidEndpoint(self.base.clone()))?;
            for segment in tail {
                segments.push(path_segment(segment)?);
            }
        }
        Ok(url.to_string())
    }

    /* --------------------- Server --------------------- */

    /// Liveness probe. Returns the server's JSON body untouched.
    #[instrument(skip_all, fields(endpoint = %self.base))]
    pub async fn heartbeat(&self) -> Result<Value> {
        let url = format!("{}/api/v2/heartbeat", self.base);
        self.send_json(self.client.get(&url), &url).await
    }

    /* --------------------- Collections --------------------- */

    /// Lists every collection of the configured tenant/database.
    #[instrument(skip_all)]
    pub async fn list_collections(&self) -> Result<Vec<CollectionRecord>> {
        let url = self.collections_url();
        self.send_json(self.client.get(&url), &url).await
    }

    /// Fetches a collection by name.
    ///
    /// # Errors
    /// [`ChromaError::CollectionNotFound`] when the server answers 404, or when
    /// it reports the missing collection through an error body (older servers
    /// answer with 400/500 instead of 404).
    #[instrument(skip_all, fields(collection = %name))]
    pub async fn get_collection(&self, name: &str) -> Result<CollectionRecord> {
        let url = self.collection_url(&[name])?;
        match self.send_json(self.client.get(&url), &url).await {
            Err(ChromaError::HttpStatus {
                status, snippet, ..
            }) if status == StatusCode::NOT_FOUND
                || snippet.to_lowercase().contains("does not exist") =>
            {
                Err(ChromaError::CollectionNotFound(name.to_string()))
            }
            other => other,
        }
    }

    /// Creates a collection (or returns the existing one when `get_or_create` is set).
    #[instrument(skip_all, fields(collection = %req.name))]
    pub async fn create_collection(
        &self,
        req: &CreateCollectionRequest,
    ) -> Result<CollectionRecord> {
        let url = self.collections_url();
        let record: CollectionRecord = self
            .send_json(self.client.post(&url).json(req), &url)
            .await?;
        info!(collection = %record.name, id = %record.id, "collection created");
        Ok(record)
    }

    /// Deletes a collection by name.
    #[instrument(skip_all, fields(collection = %name))]
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        let url = self.collection_url(&[name])?;
        match self.send_unit(self.client.delete(&url), &url).await {
            Err(ChromaError::HttpStatus { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(ChromaError::CollectionNotFound(name.to_string()))
            }
            other => other,
        }
    }

    /* --------------------- Records --------------------- */

    /// Number of records in the collection.
    #[instrument(skip_all, fields(collection = %collection_id))]
    pub async fn count(&self, collection_id: &str) -> Result<usize> {
        let url = self.collection_url(&[collection_id, "count"])?;
        self.send_json(self.client.get(&url), &url).await
    }

    /// Flat "get" by ids / filters / page.
    #[instrument(skip_all, fields(collection = %collection_id))]
    pub async fn get(&self, collection_id: &str, req: &GetRequest) -> Result<GetResponse> {
        let url = self.collection_url(&[collection_id, "get"])?;
        self.send_json(self.client.post(&url).json(req), &url).await
    }

    /// Nearest-neighbor "query".
    #[instrument(skip_all, fields(collection = %collection_id, n_results = req.n_results))]
    pub async fn query(&self, collection_id: &str, req: &QueryRequest) -> Result<QueryResponse> {
        let url = self.collection_url(&[collection_id, "query"])?;
        self.send_json(self.client.post(&url).json(req), &url).await
    }

    /// Adds new records.
    #[instrument(skip_all, fields(collection = %collection_id, count = req.ids.len()))]
    pub async fn add(&self, collection_id: &str, req: &AddRequest) -> Result<()> {
        let url = self.collection_url(&[collection_id, "add"])?;
        self.send_unit(self.client.post(&url).json(req), &url).await
    }

    /// Updates existing records.
    #[instrument(skip_all, fields(collection = %collection_id, count = req.ids.len()))]
    pub async fn update(&self, collection_id: &str, req: &UpdateRequest) -> Result<()> {
        let url = self.collection_url(&[collection_id, "update"])?;
        self.send_unit(self.client.post(&url).json(req), &url).await
    }

    /// Deletes records by ids and/or metadata filter.
    #[instrument(skip_all, fields(collection = %collection_id))]
    pub async fn delete(&self, collection_id: &str, req: &DeleteRequest) -> Result<()> {
        let url = self.collection_url(&[collection_id, "delete"])?;
        self.send_unit(self.client.post(&url).json(req), &url).await
    }

    /* --------------------- Internals --------------------- */

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder, url: &str) -> Result<T> {
        let resp = self.send(req, url).await?;
        resp.json::<T>().await.map_err(|e| {
            ChromaError::Decode(format!("unexpected response from {url}: {e}"))
        })
    }

    async fn send_unit(&self, req: RequestBuilder, url: &str) -> Result<()> {
        self.send(req, url).await.map(|_| ())
    }

    async fn send(&self, req: RequestBuilder, url: &str) -> Result<Response> {
        debug!("{url}");
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(%url, %status, %snippet, "chroma returned non-success status");

            return Err(ChromaError::HttpStatus {
                status,
                url: url.to_string(),
                snippet,
            });
        }

        Ok(resp)
    }
}

/// Names become single URL path segments; `.`/`..` and blanks would change
/// which endpoint is addressed, so they are refused.
fn path_segment(name: &str) -> Result<&str> {
    match name {
        "" | "." | ".." => Err(ChromaError::InvalidName(name.to_string())),
        _ => Ok(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Include;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COLLECTIONS: &str = "/api/v2/tenants/default_tenant/databases/default_database/collections";

    fn client_for(server: &MockServer) -> ChromaClient {
        ChromaClient::new(ChromaConfig::new(server.uri())).unwrap()
    }

    #[test]
    fn rejects_endpoint_without_scheme() {
        let err = ChromaClient::new(ChromaConfig::new("localhost:8000")).unwrap_err();
        assert!(matches!(err, ChromaError::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn heartbeat_returns_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/heartbeat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "nanosecond heartbeat": 42 })),
            )
            .mount(&server)
            .await;

        let body = client_for(&server).heartbeat().await.unwrap();
        assert_eq!(body, json!({ "nanosecond heartbeat": 42 }));
    }

    #[tokio::test]
    async fn non_success_status_carries_snippet() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/heartbeat"))
            .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
            .mount(&server)
            .await;

        let err = client_for(&server).heartbeat().await.unwrap_err();
        match err {
            ChromaError::HttpStatus {
                status, snippet, ..
            } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(snippet, "warming up");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_collection_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{COLLECTIONS}/missing")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": "NotFoundError",
                "message": "Collection [missing] does not exist"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).get_collection("missing").await.unwrap_err();
        assert!(matches!(err, ChromaError::CollectionNotFound(name) if name == "missing"));
    }

    #[tokio::test]
    async fn get_sends_filters_and_normalizes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{COLLECTIONS}/c-1/get")))
            .and(body_partial_json(json!({
                "where_document": { "$contains": "hello" },
                "limit": 20,
                "offset": 0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ids": ["d1"],
                "documents": ["hello world"],
                "metadatas": [{ "category": "greeting" }],
                "include": ["documents", "metadatas"]
            })))
            .mount(&server)
            .await;

        let req = GetRequest {
            where_document: Some(json!({ "$contains": "hello" })),
            limit: Some(20),
            offset: Some(0),
            include: vec![Include::Documents, Include::Metadatas],
            ..Default::default()
        };
        let docs = client_for(&server)
            .get("c-1", &req)
            .await
            .unwrap()
            .into_documents();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "hello world");
        assert_eq!(docs[0].metadata.as_ref().unwrap()["category"], json!("greeting"));
    }

    #[tokio::test]
    async fn count_decodes_bare_integer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{COLLECTIONS}/c-1/count")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(7)))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).count("c-1").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let client = ChromaClient::new(ChromaConfig::new("http://127.0.0.1:1").with_timeout_secs(2))
            .unwrap();
        let err = client.heartbeat().await.unwrap_err();
        assert!(matches!(err, ChromaError::Transport(_)));
    }

    #[tokio::test]
    async fn names_are_sent_as_single_encoded_segments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{COLLECTIONS}/a%3Fx=1")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "c-q", "name": "a?x=1" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{COLLECTIONS}/c%2F..")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "c-s", "name": "c/.." })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.get_collection("a?x=1").await.unwrap().id, "c-q");
        assert_eq!(client.get_collection("c/..").await.unwrap().id, "c-s");
    }

    #[tokio::test]
    async fn dot_segments_are_refused_before_sending() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        for name in ["", ".", ".."] {
            let err = client.get_collection(name).await.unwrap_err();
            assert!(matches!(err, ChromaError::InvalidName(_)), "name {name:?}");
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn blank_tenant_is_rejected() {
        let cfg = ChromaConfig {
            tenant: String::new(),
            ..ChromaConfig::new("http://localhost:8000")
        };
        assert!(matches!(
            ChromaClient::new(cfg).unwrap_err(),
            ChromaError::InvalidName(_)
        ));
    }
}
