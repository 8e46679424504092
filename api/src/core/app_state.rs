use std::sync::Arc;

use chroma_client::{ChromaClient, ChromaConfig, ChromaError};
use explorer_core::{Embedder, EmbeddingConfig, EmbeddingError, SessionManager};
use thiserror::Error;
use tracing::info;

/// Address the API listens on when `API_ADDRESS` is unset.
pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chroma config: {0}")]
    Chroma(#[from] ChromaError),

    #[error("embedding config: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, e.g. "127.0.0.1:3000".
    pub address: String,
    /// Heartbeat proxy upstream plus tenant/database/timeout for every session.
    pub chroma: ChromaConfig,
    /// Provider used to embed queries and documents.
    pub embedding: EmbeddingConfig,
}

impl AppConfig {
    /// Load settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let address = std::env::var("API_ADDRESS")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_ADDRESS.into());

        Ok(Self {
            address,
            chroma: ChromaConfig::from_env()?,
            embedding: EmbeddingConfig::from_env()?,
        })
    }
}

/// Shared state for all HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    /// The single admin session, empty until `POST /api/connection`.
    pub sessions: Arc<SessionManager>,
    /// Client for the configured upstream, used by the heartbeat proxy.
    pub upstream: ChromaClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let AppConfig {
            chroma, embedding, ..
        } = config;
        let embedder = Embedder::from_config(embedding)?;
        let upstream = ChromaClient::new(chroma.clone())?;

        info!(
            upstream = %upstream.endpoint(),
            embedder = embedder.kind(),
            "app state ready"
        );

        Ok(Self {
            sessions: Arc::new(SessionManager::new(chroma, embedder)),
            upstream,
        })
    }
}
