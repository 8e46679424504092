//! Display schema inferred from a single sampled document.
//!
//! This is an approximation, not the server's schema: field names and types
//! come from the metadata of the first document returned by a `limit = 1`
//! get. Vector dimension and distance function are not read from the server.

use chroma_client::models::Metadata;
use chroma_client::wire::{GetRequest, Include};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::embedding::EmbeddingProvider;
use crate::errors::ExplorerResult;
use crate::session::Session;

/// Nearest-neighbor metric reported in the schema. Collections are created
/// with the cosine space, so it is the only one reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceFunction {
    #[default]
    Cosine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub vector_dimension: usize,
    pub distance_function: DistanceFunction,
    pub fields: Vec<SchemaField>,
}

/// Type label of a metadata value.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

/// One field per metadata key of the sample, typed from its value.
pub fn infer_fields(sample: Option<&Metadata>) -> Vec<SchemaField> {
    sample
        .map(|meta| {
            meta.iter()
                .map(|(name, value)| SchemaField {
                    name: name.clone(),
                    field_type: value_kind(value).to_string(),
                    required: false,
                    description: None,
                })
                .collect()
        })
        .unwrap_or_default()
}

impl Session {
    /// Infers the display schema of `collection` from one sampled document.
    #[instrument(skip_all, fields(collection = %collection))]
    pub async fn collection_schema(&self, collection: &str) -> ExplorerResult<CollectionSchema> {
        let record = self.client().get_collection(collection).await?;
        let sample = self
            .client()
            .get(
                &record.id,
                &GetRequest {
                    limit: Some(1),
                    include: vec![Include::Metadatas],
                    ..Default::default()
                },
            )
            .await?
            .into_documents();

        let fields = infer_fields(sample.first().and_then(|d| d.metadata.as_ref()));
        debug!(fields = fields.len(), "schema inferred");

        Ok(CollectionSchema {
            name: record.name,
            vector_dimension: self.embedder().dimension(),
            distance_function: DistanceFunction::Cosine,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_follow_json_types() {
        assert_eq!(value_kind(&json!([1, 2])), "array");
        assert_eq!(value_kind(&json!({ "a": 1 })), "object");
        assert_eq!(value_kind(&json!("x")), "string");
        assert_eq!(value_kind(&json!(1.5)), "number");
        assert_eq!(value_kind(&json!(false)), "boolean");
        assert_eq!(value_kind(&Value::Null), "null");
    }

    #[test]
    fn no_sample_means_no_fields() {
        assert!(infer_fields(None).is_empty());
        assert!(infer_fields(Some(&Metadata::new())).is_empty());
    }

    #[test]
    fn fields_are_typed_from_the_sample() {
        let meta = json!({ "category": "greeting", "views": 3 });
        let fields = infer_fields(meta.as_object());
        assert_eq!(
            fields,
            vec![
                SchemaField {
                    name: "category".into(),
                    field_type: "string".into(),
                    required: false,
                    description: None,
                },
                SchemaField {
                    name: "views".into(),
                    field_type: "number".into(),
                    required: false,
                    description: None,
                },
            ]
        );
    }

    #[test]
    fn schema_serializes_with_type_key() {
        let schema = CollectionSchema {
            name: "docs".into(),
            vector_dimension: 1536,
            distance_function: DistanceFunction::Cosine,
            fields: vec![],
        };
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "name": "docs",
                "vector_dimension": 1536,
                "distance_function": "cosine",
                "fields": []
            })
        );
    }

    mod remote {
        use super::*;
        use crate::test_support::{COLLECTIONS, connected, mount_collection};
        use wiremock::matchers::{body_partial_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        async fn sample(server: &MockServer, body: Value) {
            Mock::given(method("POST"))
                .and(path(format!("{COLLECTIONS}/c-1/get")))
                .and(body_partial_json(json!({ "limit": 1, "include": ["metadatas"] })))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(1)
                .mount(server)
                .await;
        }

        #[tokio::test]
        async fn empty_collection_has_no_fields() {
            let server = MockServer::start().await;
            let (_sessions, session) = connected(&server).await;
            mount_collection(&server, "docs", "c-1").await;
            sample(&server, json!({ "ids": [], "metadatas": [] })).await;

            let schema = session.collection_schema("docs").await.unwrap();
            assert_eq!(schema.name, "docs");
            assert_eq!(schema.vector_dimension, 1536);
            assert_eq!(schema.distance_function, DistanceFunction::Cosine);
            assert!(schema.fields.is_empty());
        }

        #[tokio::test]
        async fn sampled_metadata_becomes_fields() {
            let server = MockServer::start().await;
            let (_sessions, session) = connected(&server).await;
            mount_collection(&server, "docs", "c-1").await;
            sample(
                &server,
                json!({ "ids": ["d1"], "metadatas": [{ "category": "greeting" }] }),
            )
            .await;

            let schema = session.collection_schema("docs").await.unwrap();
            assert_eq!(schema.fields.len(), 1);
            assert_eq!(schema.fields[0].name, "category");
            assert_eq!(schema.fields[0].field_type, "string");
            assert!(!schema.fields[0].required);
        }
    }
}
