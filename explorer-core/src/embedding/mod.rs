//! Embedding providers behind one capability trait.
//!
//! Chroma's HTTP API stores and searches vectors, so every add/update/query
//! needs embeddings computed on this side. Providers:
//!   * [`HashEmbedding`]: deterministic placeholder with no semantic value,
//!     meant only for local/demo servers.
//!   * [`OllamaEmbedding`]: real embeddings from an Ollama server.
//!
//! [`Embedder`] is the enum facade used by the session so call sites never
//! name a concrete provider.

pub mod hash;
pub mod ollama;

use std::future::Future;

use reqwest::StatusCode;
use thiserror::Error;

pub use hash::{HashEmbedding, PLACEHOLDER_DIMENSION};
pub use ollama::OllamaEmbedding;

/// Errors produced by embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Provider settings are missing or invalid.
    #[error("embedding config error: {0}")]
    Config(String),

    /// Transport/HTTP client error.
    #[error("embedding transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from the provider.
    #[error("embedding provider returned HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("failed to decode embedding response: {0}")]
    Decode(String),

    /// Provider returned a vector of the wrong length.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Turns texts into fixed-length vectors.
pub trait EmbeddingProvider {
    /// Length of every vector this provider produces.
    fn dimension(&self) -> usize;

    /// Embeds `texts`, returning one vector per input in the same order.
    fn generate(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;
}

/// Provider selection, usually read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingConfig {
    Hash {
        dimension: usize,
    },
    Ollama {
        endpoint: String,
        model: String,
        dimension: usize,
        timeout_secs: Option<u64>,
    },
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig::Hash {
            dimension: PLACEHOLDER_DIMENSION,
        }
    }
}

impl EmbeddingConfig {
    /// Loads provider settings from the environment.
    ///
    /// # Env
    /// - `EMBEDDING_PROVIDER`: `hash` (default) or `ollama`
    /// - `EMBEDDING_DIM`: vector length (default 1536 for `hash`, required for `ollama`)
    /// - `EMBEDDING_MODEL`: model name (required for `ollama`)
    /// - `OLLAMA_URL`: Ollama endpoint (default `http://localhost:11434`)
    /// - `EMBEDDING_TIMEOUT_SECS`: optional request timeout for `ollama`
    pub fn from_env() -> Result<Self, EmbeddingError> {
        let provider = env_trimmed("EMBEDDING_PROVIDER").unwrap_or_else(|| "hash".to_string());
        let dimension = match env_trimmed("EMBEDDING_DIM") {
            Some(v) => Some(v.parse::<usize>().map_err(|_| {
                EmbeddingError::Config(format!("EMBEDDING_DIM must be a positive integer, got '{v}'"))
            })?),
            None => None,
        };

        match provider.to_lowercase().as_str() {
            "hash" | "placeholder" => Ok(EmbeddingConfig::Hash {
                dimension: dimension.unwrap_or(PLACEHOLDER_DIMENSION),
            }),
            "ollama" => {
                let model = env_trimmed("EMBEDDING_MODEL").ok_or_else(|| {
                    EmbeddingError::Config("EMBEDDING_MODEL is required for ollama".into())
                })?;
                let dimension = dimension.ok_or_else(|| {
                    EmbeddingError::Config("EMBEDDING_DIM is required for ollama".into())
                })?;
                let timeout_secs = match env_trimmed("EMBEDDING_TIMEOUT_SECS") {
                    Some(v) => Some(v.parse::<u64>().map_err(|_| {
                        EmbeddingError::Config(format!(
                            "EMBEDDING_TIMEOUT_SECS must be an integer, got '{v}'"
                        ))
                    })?),
                    None => None,
                };
                Ok(EmbeddingConfig::Ollama {
                    endpoint: env_trimmed("OLLAMA_URL")
                        .unwrap_or_else(|| "http://localhost:11434".to_string()),
                    model,
                    dimension,
                    timeout_secs,
                })
            }
            other => Err(EmbeddingError::Config(format!(
                "unsupported EMBEDDING_PROVIDER '{other}' (expected 'hash' or 'ollama')"
            ))),
        }
    }
}

fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Concrete provider with enum dispatch.
#[derive(Debug, Clone)]
pub enum Embedder {
    Hash(HashEmbedding),
    Ollama(OllamaEmbedding),
}

impl Default for Embedder {
    fn default() -> Self {
        Embedder::Hash(HashEmbedding::default())
    }
}

impl Embedder {
    /// Builds the provider described by `cfg`.
    pub fn from_config(cfg: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        match cfg {
            EmbeddingConfig::Hash { dimension } => Ok(Embedder::Hash(HashEmbedding::new(dimension)?)),
            EmbeddingConfig::Ollama {
                endpoint,
                model,
                dimension,
                timeout_secs,
            } => Ok(Embedder::Ollama(OllamaEmbedding::new(
                endpoint,
                model,
                dimension,
                timeout_secs,
            )?)),
        }
    }

    /// Short provider label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Embedder::Hash(_) => "hash",
            Embedder::Ollama(_) => "ollama",
        }
    }

    /// Embeds a single text.
    pub async fn generate_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.generate(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Decode("provider returned no vectors".into()))
    }
}

impl EmbeddingProvider for Embedder {
    fn dimension(&self) -> usize {
        match self {
            Embedder::Hash(p) => p.dimension(),
            Embedder::Ollama(p) => p.dimension(),
        }
    }

    async fn generate(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        match self {
            Embedder::Hash(p) => p.generate(texts).await,
            Embedder::Ollama(p) => p.generate(texts).await,
        }
    }
}
