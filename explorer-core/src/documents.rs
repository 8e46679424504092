//! Document CRUD inside a collection.
//!
//! Embeddings are computed locally with the session's provider before any
//! write that carries text, so the server never needs its own embedder.

use chroma_client::models::{Document, Metadata};
use chroma_client::wire::{AddRequest, DeleteRequest, GetRequest, Include, UpdateRequest};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{ExplorerError, ExplorerResult};
use crate::session::Session;

/// A document to insert. A missing id gets a random UUID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Partial update; absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.metadata.is_none()
    }
}

impl Session {
    /// Embeds and stores one document, returning its id.
    #[instrument(skip_all, fields(collection = %collection))]
    pub async fn add_document(&self, collection: &str, doc: NewDocument) -> ExplorerResult<String> {
        let id = doc
            .id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let record = self.client().get_collection(collection).await?;
        let embedding = self.embedder().generate_one(&doc.content).await?;

        self.client()
            .add(
                &record.id,
                &AddRequest {
                    ids: vec![id.clone()],
                    embeddings: vec![embedding],
                    documents: vec![doc.content],
                    metadatas: vec![doc.metadata.unwrap_or_default()],
                },
            )
            .await?;

        info!(%id, "document added");
        Ok(id)
    }

    /// Fetches one document by id.
    ///
    /// # Errors
    /// [`ExplorerError::NotFound`] when the collection holds no such id.
    #[instrument(skip_all, fields(collection = %collection, id = %id))]
    pub async fn get_document(&self, collection: &str, id: &str) -> ExplorerResult<Document> {
        let record = self.client().get_collection(collection).await?;
        let resp = self
            .client()
            .get(
                &record.id,
                &GetRequest {
                    ids: Some(vec![id.to_string()]),
                    include: vec![Include::Documents, Include::Metadatas],
                    ..Default::default()
                },
            )
            .await?;

        resp.into_documents()
            .into_iter()
            .next()
            .ok_or_else(|| ExplorerError::NotFound(format!("document '{id}' in '{collection}'")))
    }

    /// Applies `patch` to one document. New content is re-embedded.
    #[instrument(skip_all, fields(collection = %collection, id = %id))]
    pub async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: DocumentPatch,
    ) -> ExplorerResult<()> {
        if patch.is_empty() {
            return Err(ExplorerError::InvalidRequest(
                "update needs content or metadata".into(),
            ));
        }

        let record = self.client().get_collection(collection).await?;
        let embeddings = match patch.content.as_deref() {
            Some(text) => Some(vec![self.embedder().generate_one(text).await?]),
            None => None,
        };

        self.client()
            .update(
                &record.id,
                &UpdateRequest {
                    ids: vec![id.to_string()],
                    embeddings,
                    documents: patch.content.map(|c| vec![c]),
                    metadatas: patch.metadata.map(|m| vec![m]),
                },
            )
            .await?;

        info!("document updated");
        Ok(())
    }

    /// Deletes documents by id.
    #[instrument(skip_all, fields(collection = %collection, n = ids.len()))]
    pub async fn delete_documents(&self, collection: &str, ids: &[String]) -> ExplorerResult<()> {
        if ids.is_empty() {
            return Err(ExplorerError::InvalidRequest("no ids to delete".into()));
        }

        let record = self.client().get_collection(collection).await?;
        self.client()
            .delete(
                &record.id,
                &DeleteRequest {
                    ids: Some(ids.to_vec()),
                    r#where: None,
                },
            )
            .await?;

        info!("documents deleted");
        Ok(())
    }
}
