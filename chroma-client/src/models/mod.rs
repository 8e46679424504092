//! Domain models shared by the client and its callers.

pub mod collection;
pub mod document;

pub use collection::{Collection, CollectionRecord};
pub use document::{Document, QueryResult};

/// Free-form metadata attached to collections and documents.
pub type Metadata = serde_json::Map<String, serde_json::Value>;
