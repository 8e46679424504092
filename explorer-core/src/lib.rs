//! Admin-side logic for browsing a Chroma vector database.
//!
//! * [`session`]: one live connection, established by a heartbeat
//! * [`search`] and [`filters`]: search modes translated into Chroma get/query calls
//! * [`collections`] and [`documents`]: CRUD on a live session
//! * [`schema`]: display schema inferred from a sampled document
//! * [`embedding`]: providers that turn text into vectors before queries and writes

pub mod collections;
pub mod documents;
pub mod embedding;
pub mod errors;
pub mod filters;
pub mod schema;
pub mod search;
pub mod session;

#[cfg(test)]
mod test_support;

pub use documents::{DocumentPatch, NewDocument};
pub use embedding::{Embedder, EmbeddingConfig, EmbeddingError, EmbeddingProvider};
pub use errors::{ExplorerError, ExplorerResult};
pub use filters::{FilterClause, FilterOperator};
pub use schema::{CollectionSchema, DistanceFunction, SchemaField};
pub use search::{SearchMode, SearchPage, SearchRequest};
pub use session::{Connection, Session, SessionManager};
