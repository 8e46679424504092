//! Crate-wide error hierarchy for explorer-core.
//!
//! Every failure is surfaced to the triggering action as a readable message;
//! none of them is retried and none of them poisons the session.

use chroma_client::ChromaError;
use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Convenient alias for crate-wide results.
pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Root error type for explorer-core.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Handshake with the remote service failed (network, non-2xx, timeout).
    #[error("failed to connect to ChromaDB: {0}")]
    Connection(String),

    /// An operation was attempted without an active session.
    #[error("not connected to ChromaDB")]
    NotConnected,

    /// A user-supplied filter could not be parsed.
    #[error("malformed filter: {0}")]
    MalformedFilter(String),

    /// The request is well-formed JSON but cannot be served as asked.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The addressed collection or document does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any failure reported by the remote service for get/query/add/update/delete/create.
    #[error("remote operation failed: {0}")]
    RemoteOperation(#[source] ChromaError),

    /// The embedding provider failed.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

impl From<ChromaError> for ExplorerError {
    fn from(err: ChromaError) -> Self {
        match err {
            ChromaError::CollectionNotFound(name) => {
                ExplorerError::NotFound(format!("collection '{name}'"))
            }
            ChromaError::InvalidName(name) => {
                ExplorerError::InvalidRequest(format!("invalid name '{name}'"))
            }
            other => ExplorerError::RemoteOperation(other),
        }
    }
}
