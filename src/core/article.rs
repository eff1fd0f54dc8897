use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A region-tagged news article.
///
/// Populated by the external ingestion pipeline; the search engine only
/// reads these records. `embedding` is present when the pipeline computed
/// a vector for the article, and its length is always the configured
/// embedding dimension across the whole corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub body_text: Option<String>,
    pub source_url: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Article {
    /// True if the article carries an embedding of the given dimension.
    pub fn has_embedding(&self, dimension: usize) -> bool {
        self.embedding
            .as_ref()
            .map(|e| e.len() == dimension)
            .unwrap_or(false)
    }
}
