//! Collection browsing and management on a live session.

use chroma_client::models::{Collection, CollectionRecord, Metadata};
use chroma_client::wire::CreateCollectionRequest;
use serde_json::Value;
use tracing::{info, instrument};

use crate::errors::{ExplorerError, ExplorerResult};
use crate::session::Session;

impl Session {
    /// All collections with their document counts, in server order.
    #[instrument(skip_all)]
    pub async fn list_collections(&self) -> ExplorerResult<Vec<Collection>> {
        let records = self.client().list_collections().await?;
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            out.push(self.with_count(record).await?);
        }
        Ok(out)
    }

    /// One collection by name, with its document count.
    #[instrument(skip_all, fields(collection = %name))]
    pub async fn get_collection(&self, name: &str) -> ExplorerResult<Collection> {
        let record = self.client().get_collection(name).await?;
        self.with_count(record).await
    }

    /// Creates a collection. Without metadata the cosine space is requested.
    #[instrument(skip_all, fields(collection = %name))]
    pub async fn create_collection(
        &self,
        name: &str,
        metadata: Option<Metadata>,
    ) -> ExplorerResult<Collection> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ExplorerError::InvalidRequest(
                "collection name must not be empty".into(),
            ));
        }

        let metadata = metadata.filter(|m| !m.is_empty()).unwrap_or_else(|| {
            let mut m = Metadata::new();
            m.insert("hnsw:space".into(), Value::String("cosine".into()));
            m
        });

        let record = self
            .client()
            .create_collection(&CreateCollectionRequest {
                name: name.to_string(),
                metadata: Some(metadata),
                get_or_create: false,
            })
            .await?;

        Ok(Collection::from_record(record, 0))
    }

    /// Deletes a collection and everything in it.
    #[instrument(skip_all, fields(collection = %name))]
    pub async fn delete_collection(&self, name: &str) -> ExplorerResult<()> {
        self.client().delete_collection(name).await?;
        info!(collection = %name, "collection deleted");
        Ok(())
    }

    async fn with_count(&self, record: CollectionRecord) -> ExplorerResult<Collection> {
        let count = self.client().count(&record.id).await?;
        Ok(Collection::from_record(record, count))
    }
}
