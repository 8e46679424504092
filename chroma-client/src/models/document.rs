use serde::{Deserialize, Serialize};

use crate::models::Metadata;

/// A stored document: text content plus optional metadata and embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

/// One row of a search result.
///
/// `distance` is only present for similarity queries; rows produced by a
/// plain "get" carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
}

impl From<Document> for QueryResult {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            content: doc.content,
            metadata: doc.metadata,
            distance: None,
        }
    }
}
