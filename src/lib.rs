//! geonews library
//!
//! Hybrid search engine for region-tagged news articles.
//!
//! # Modules
//!
//! - `core`: Article model and SQLite store
//! - `search`: Hybrid retrieval engine (semantic + keyword)

pub mod core;
pub mod search;

// Re-exports for convenience
pub use self::core::article::Article;
pub use self::core::store::{ArticleStore, StoreStats};
pub use search::embedding::{EmbeddingConfig, EmbeddingProvider, OllamaEmbedder};
pub use search::engine::SearchEngine;
pub use search::merge::SearchResult;
pub use search::relevance::RelevanceTier;
