use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Metadata;

/// Collection as returned by the Chroma collections endpoints.
///
/// Only the fields this client relies on are decoded; the rest of the
/// server payload (configuration, log position, version...) is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Read-only mirror of a remote collection together with its document count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Collection {
    /// Joins a collection record with the result of a separate count call.
    pub fn from_record(record: CollectionRecord, count: usize) -> Self {
        Self {
            id: record.id,
            name: record.name,
            count,
            metadata: record.metadata,
            created_at: record.created_at,
        }
    }
}
