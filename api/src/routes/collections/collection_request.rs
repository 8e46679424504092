use chroma_client::models::Metadata;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/collections`.
#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
    /// Collection metadata; omitted means the cosine space.
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Serialize)]
pub struct DeletedCollection {
    pub deleted: String,
}
