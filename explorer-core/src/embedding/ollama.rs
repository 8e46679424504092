//! Embeddings from an Ollama server via `POST {endpoint}/api/embeddings`.
//!
//! One request per text. Every returned vector must match the configured
//! dimension.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::embedding::{EmbeddingError, EmbeddingProvider};

#[derive(Debug, Clone)]
pub struct OllamaEmbedding {
    client: reqwest::Client,
    model: String,
    dimension: usize,
    url_embeddings: String,
}

impl OllamaEmbedding {
    /// Creates a provider for `model` served at `endpoint`.
    ///
    /// # Errors
    /// - [`EmbeddingError::Config`] if the endpoint lacks http/https, the model is empty or `dimension` is 0
    /// - [`EmbeddingError::Transport`] if the HTTP client cannot be built
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
        timeout_secs: Option<u64>,
    ) -> Result<Self, EmbeddingError> {
        let endpoint = endpoint.into();
        let endpoint = endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(EmbeddingError::Config(format!(
                "invalid Ollama endpoint '{endpoint}': must start with http:// or https://"
            )));
        }

        let model = model.into();
        if model.trim().is_empty() {
            return Err(EmbeddingError::Config("embedding model must not be empty".into()));
        }
        if dimension == 0 {
            return Err(EmbeddingError::Config("embedding dimension must be > 0".into()));
        }

        let timeout = Duration::from_secs(timeout_secs.unwrap_or(60));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let url_embeddings = format!("{}/api/embeddings", endpoint.trim_end_matches('/'));

        Ok(Self {
            client,
            model,
            dimension,
            url_embeddings,
        })
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbeddingsRequest {
            model: &self.model,
            prompt: text,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::HttpStatus {
                status,
                url: self.url_embeddings.clone(),
                snippet: text.chars().take(240).collect(),
            });
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            EmbeddingError::Decode(format!("serde error: {e}; expected `{{ embedding: number[] }}`"))
        })?;

        if out.embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: out.embedding.len(),
            });
        }

        Ok(out.embedding)
    }
}

impl EmbeddingProvider for OllamaEmbedding {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn generate(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}
