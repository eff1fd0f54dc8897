//! Embedding provider client
//!
//! The engine never computes embeddings itself; it asks an external
//! Ollama-compatible provider for a query vector. A single bounded
//! request per call, no retries. Every failure mode collapses into
//! [`EmbeddingUnavailable`] so callers can treat the semantic path as
//! optional.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default embedding dimension (nomic-embed-text)
pub const DEFAULT_DIMENSION: usize = 768;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "nomic-embed-text";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// The embedding provider could not produce a vector: timeout,
/// non-success status, connection failure, or malformed payload.
#[derive(Debug, Error)]
#[error("embedding provider unavailable: {reason}")]
pub struct EmbeddingUnavailable {
    reason: String,
}

impl EmbeddingUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Turns query text into a fixed-dimension vector.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingUnavailable>;

    /// Vector dimension this provider is configured for.
    fn dimension(&self) -> usize;
}

/// Embedding provider configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
    pub timeout: Duration,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl EmbeddingConfig {
    /// Read configuration from `GEONEWS_EMBED_*` variables, falling back
    /// to Ollama defaults. Unparsable numeric values are reported and
    /// ignored rather than silently changing the dimension or timeout.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: std::env::var("GEONEWS_EMBED_URL").unwrap_or(defaults.base_url),
            model: std::env::var("GEONEWS_EMBED_MODEL").unwrap_or(defaults.model),
            dimension: parse_env("GEONEWS_EMBED_DIM").unwrap_or(defaults.dimension),
            timeout: parse_env("GEONEWS_EMBED_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(%name, value = %raw, "ignoring unparsable value, using default");
            None
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

/// Ollama-compatible HTTP embedding client.
pub struct OllamaEmbedder {
    client: reqwest::blocking::Client,
    config: EmbeddingConfig,
}

impl OllamaEmbedder {
    pub fn new(config: EmbeddingConfig) -> Result<Self, EmbeddingUnavailable> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingUnavailable::new(format!("http client init failed: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, EmbeddingUnavailable> {
        Self::new(EmbeddingConfig::from_env())
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingUnavailable> {
        let request = OllamaEmbeddingRequest {
            model: &self.config.model,
            prompt: text,
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.config.base_url))
            .json(&request)
            .send()
            .map_err(|e| EmbeddingUnavailable::new(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EmbeddingUnavailable::new(format!(
                "provider returned status {}",
                response.status()
            )));
        }

        let body: OllamaEmbeddingResponse = response
            .json()
            .map_err(|e| EmbeddingUnavailable::new(format!("malformed response: {e}")))?;

        if body.embedding.len() != self.config.dimension {
            return Err(EmbeddingUnavailable::new(format!(
                "expected {}-dimensional vector, got {}",
                self.config.dimension,
                body.embedding.len()
            )));
        }

        Ok(body.embedding)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}

/// Cosine similarity between two vectors (1 − cosine distance).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        // Length mismatch and zero vectors degrade to 0.0
        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_config_defaults() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "nomic-embed-text");
        assert_eq!(config.dimension, 768);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_env_ignores_unparsable_values() {
        std::env::set_var("GEONEWS_EMBED_DIM", "not-a-number");
        std::env::set_var("GEONEWS_EMBED_TIMEOUT_SECS", "soon");

        let config = EmbeddingConfig::from_env();
        assert_eq!(config.dimension, DEFAULT_DIMENSION);
        assert_eq!(config.timeout, Duration::from_secs(10));

        std::env::remove_var("GEONEWS_EMBED_DIM");
        std::env::remove_var("GEONEWS_EMBED_TIMEOUT_SECS");
    }

    #[test]
    fn test_request_wire_format() {
        let request = OllamaEmbeddingRequest {
            model: "nomic-embed-text",
            prompt: "flooding risk",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "nomic-embed-text");
        assert_eq!(json["prompt"], "flooding risk");

        let response: OllamaEmbeddingResponse =
            serde_json::from_str(r#"{"embedding": [0.1, 0.2]}"#).unwrap();
        assert_eq!(response.embedding, vec![0.1, 0.2]);
    }
}
