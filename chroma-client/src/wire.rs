//! Request and response payloads for the Chroma collection endpoints.
//!
//! Chroma answers "get" with flat arrays (one entry per document) and "query"
//! with nested arrays (one outer entry per query embedding). Both shapes are
//! turned into plain `Vec`s of [`Document`] / [`QueryResult`] right here, so
//! callers never branch on the response shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Document, Metadata, QueryResult};

/* ==========================
Requests
========================== */

/// Fields Chroma may return alongside ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Include {
    Documents,
    Metadatas,
    Embeddings,
    Distances,
}

/// Body for `POST .../collections/{id}/get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#where: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub where_document: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    pub include: Vec<Include>,
}

/// Body for `POST .../collections/{id}/query`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub query_embeddings: Vec<Vec<f32>>,
    pub n_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#where: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub where_document: Option<Value>,
    pub include: Vec<Include>,
}

/// Body for `POST .../collections/{id}/add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddRequest {
    pub ids: Vec<String>,
    pub embeddings: Vec<Vec<f32>>,
    pub documents: Vec<String>,
    pub metadatas: Vec<Metadata>,
}

/// Body for `POST .../collections/{id}/update`. Omitted fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateRequest {
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<Vec<f32>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadatas: Option<Vec<Metadata>>,
}

/// Body for `POST .../collections/{id}/delete`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeleteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#where: Option<Value>,
}

/// Body for `POST .../collections`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub get_or_create: bool,
}

/* ==========================
Responses
========================== */

/// Flat response of a "get": index `i` of every array describes document `i`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetResponse {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub documents: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub metadatas: Option<Vec<Option<Metadata>>>,
    #[serde(default)]
    pub embeddings: Option<Vec<Option<Vec<f32>>>>,
}

impl GetResponse {
    /// Flattens the column arrays into documents, in server order.
    pub fn into_documents(self) -> Vec<Document> {
        let mut documents = self.documents.unwrap_or_default().into_iter();
        let mut metadatas = self.metadatas.unwrap_or_default().into_iter();
        let mut embeddings = self.embeddings.unwrap_or_default().into_iter();

        self.ids
            .into_iter()
            .map(|id| Document {
                id,
                content: documents.next().flatten().unwrap_or_default(),
                metadata: metadatas.next().flatten(),
                embedding: embeddings.next().flatten(),
            })
            .collect()
    }

    /// Same as [`GetResponse::into_documents`], as distance-less result rows.
    pub fn into_results(self) -> Vec<QueryResult> {
        self.into_documents()
            .into_iter()
            .map(QueryResult::from)
            .collect()
    }
}

/// Nested response of a "query": outer index is the query, inner the rank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub ids: Vec<Vec<String>>,
    #[serde(default)]
    pub documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    pub metadatas: Option<Vec<Vec<Option<Metadata>>>>,
    #[serde(default)]
    pub distances: Option<Vec<Vec<Option<f32>>>>,
}

impl QueryResponse {
    /// Maps row `[0][i]` of every array into a result, keeping rank order.
    ///
    /// Only the first query is read; this client always sends exactly one.
    pub fn into_results(self) -> Vec<QueryResult> {
        let mut documents = first_row(self.documents).into_iter();
        let mut metadatas = first_row(self.metadatas).into_iter();
        let mut distances = first_row(self.distances).into_iter();

        self.ids
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|id| QueryResult {
                id,
                content: documents.next().flatten().unwrap_or_default(),
                metadata: metadatas.next().flatten(),
                distance: distances.next().flatten(),
            })
            .collect()
    }
}

fn first_row<T>(rows: Option<Vec<Vec<T>>>) -> Vec<T> {
    rows.and_then(|r| r.into_iter().next()).unwrap_or_default()
}
