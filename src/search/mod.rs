//! Hybrid retrieval: semantic similarity blended with keyword matching.
//!
//! The orchestrating engine lives in `engine`; everything else here is a
//! stateless pure function over its inputs.

pub mod embedding;
pub mod engine;
pub mod merge;
pub mod relevance;

pub use embedding::{EmbeddingConfig, EmbeddingProvider, EmbeddingUnavailable, OllamaEmbedder};
pub use engine::{SearchEngine, DEFAULT_TOP_K};
pub use merge::SearchResult;
pub use relevance::RelevanceTier;
