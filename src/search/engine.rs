//! Search engine - hybrid semantic + keyword retrieval
//!
//! One call per request, no state in between. The semantic path
//! (embedding call + vector ranking) and the lexical path run as
//! independent tasks; a semantic failure is captured and logged, never
//! surfaced to the caller, while a lexical failure is fatal because it
//! means the article store itself is broken.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::warn;

use super::embedding::EmbeddingProvider;
use super::merge::{merge, SearchResult};
use super::relevance::{classify, RelevanceTier};
use crate::core::article::Article;
use crate::core::store::ArticleStore;

/// Default number of semantic candidates per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Hybrid search engine over the article store.
pub struct SearchEngine {
    db_path: PathBuf,
    provider: Option<Box<dyn EmbeddingProvider>>,
    top_k: usize,
}

impl SearchEngine {
    /// Create an engine over the store at `db_path`.
    ///
    /// Each search opens its own read connections, so the engine itself
    /// carries no per-request state.
    pub fn new(db_path: &Path, provider: Box<dyn EmbeddingProvider>) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
            provider: Some(provider),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Create an engine without an embedding provider.
    ///
    /// Searches behave as if the semantic path were down: keyword
    /// matches only, regardless of `ai_enabled`.
    pub fn keyword_only(db_path: &Path) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
            provider: None,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Run a hybrid search.
    ///
    /// With `ai_enabled` the semantic path runs on its own thread,
    /// concurrently with the keyword lookup; its errors are logged and
    /// degrade the result to keyword-only. With `ai_enabled=false` the
    /// embedding provider is never contacted.
    pub fn search(&self, query: &str, ai_enabled: bool) -> Result<Vec<SearchResult>> {
        thread::scope(|scope| {
            let semantic_task = (ai_enabled && self.provider.is_some())
                .then(|| scope.spawn(|| self.semantic_candidates(query)));

            let store = ArticleStore::open(&self.db_path)?;
            let lexical = store.containing_substring(query)?;

            let semantic = match semantic_task.map(|task| task.join()) {
                Some(Ok(Ok(candidates))) => candidates,
                Some(Ok(Err(e))) => {
                    warn!(error = %e, "semantic search failed, returning keyword matches only");
                    Vec::new()
                }
                Some(Err(_)) => {
                    warn!("semantic search panicked, returning keyword matches only");
                    Vec::new()
                }
                None => Vec::new(),
            };

            Ok(merge(semantic, lexical))
        })
    }

    /// Embed the query, rank by similarity, classify, and drop everything
    /// below the inclusion threshold.
    fn semantic_candidates(&self, query: &str) -> Result<Vec<(Article, f32, RelevanceTier)>> {
        let Some(provider) = self.provider.as_ref() else {
            return Ok(Vec::new());
        };
        let vector = provider.embed(query)?;

        let store = ArticleStore::open(&self.db_path)?;
        let ranked = store.nearest_by_vector(&vector, self.top_k)?;

        Ok(ranked
            .into_iter()
            .filter_map(|(article, score)| classify(score).map(|tier| (article, score, tier)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::embedding::EmbeddingUnavailable;
    use tempfile::TempDir;

    /// Provider that always returns the same vector.
    struct FixedEmbedder(Vec<f32>);

    impl EmbeddingProvider for FixedEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingUnavailable> {
            Ok(self.0.clone())
        }

        fn dimension(&self) -> usize {
            self.0.len()
        }
    }

    /// Provider that is always down.
    struct DownEmbedder;

    impl EmbeddingProvider for DownEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingUnavailable> {
            Err(EmbeddingUnavailable::new("connection refused"))
        }

        fn dimension(&self) -> usize {
            4
        }
    }

    fn article(id: i64, title: &str, embedding: Option<Vec<f32>>) -> Article {
        Article {
            id,
            title: title.to_string(),
            summary: None,
            body_text: None,
            source_url: format!("https://example.com/{id}"),
            region: None,
            category: None,
            published_at: None,
            sentiment_score: None,
            lat: None,
            lon: None,
            embedding,
        }
    }

    /// Corpus from the flood-warning scenario: article 1 is semantically
    /// close to "flooding risk" without containing it; article 2 contains
    /// the literal phrase but has no embedding.
    fn flood_corpus() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("articles.db");
        let store = ArticleStore::open(&db_path).unwrap();

        // Unit vector at 0.75 cosine against the query direction [1, 0, 0, 0]
        let close = vec![0.75, (1.0f32 - 0.75 * 0.75).sqrt(), 0.0, 0.0];
        store
            .upsert_article(&article(
                1,
                "Flood warning issued for downtown area",
                Some(close),
            ))
            .unwrap();

        store
            .upsert_article(&article(
                2,
                "City announces flooding risk assessment",
                None,
            ))
            .unwrap();

        // Semantically unrelated, no substring match either
        store
            .upsert_article(&article(
                3,
                "Sports roundup",
                Some(vec![0.0, 0.0, 1.0, 0.0]),
            ))
            .unwrap();

        (dir, db_path)
    }

    fn query_vector() -> Vec<f32> {
        vec![1.0, 0.0, 0.0, 0.0]
    }

    #[test]
    fn test_hybrid_search_healthy() {
        let (_dir, db_path) = flood_corpus();
        let engine = SearchEngine::new(&db_path, Box::new(FixedEmbedder(query_vector())));

        let results = engine.search("flooding risk", true).unwrap();
        let ids: Vec<i64> = results.iter().map(|r| r.article.id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert!((results[0].score.unwrap() - 0.75).abs() < 1e-3);
        assert_eq!(results[0].relevance, Some(RelevanceTier::HighlyRelevant));
        assert!(results[1].score.is_none());
        assert!(results[1].relevance.is_none());
    }

    #[test]
    fn test_ai_disabled_is_keyword_only() {
        let (_dir, db_path) = flood_corpus();
        let engine = SearchEngine::new(&db_path, Box::new(FixedEmbedder(query_vector())));

        let results = engine.search("flooding risk", false).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].article.id, 2);
        assert!(results[0].score.is_none());
        assert!(results[0].relevance.is_none());
    }

    #[test]
    fn test_provider_failure_degrades_to_keyword_only() {
        let (_dir, db_path) = flood_corpus();
        let down = SearchEngine::new(&db_path, Box::new(DownEmbedder));
        let off = SearchEngine::new(&db_path, Box::new(FixedEmbedder(query_vector())));

        let degraded = down.search("flooding risk", true).unwrap();
        let keyword_only = off.search("flooding risk", false).unwrap();

        let degraded_ids: Vec<i64> = degraded.iter().map(|r| r.article.id).collect();
        let keyword_ids: Vec<i64> = keyword_only.iter().map(|r| r.article.id).collect();
        assert_eq!(degraded_ids, keyword_ids);
        assert!(degraded.iter().all(|r| r.score.is_none()));
    }

    #[test]
    fn test_no_provider_behaves_like_keyword_only() {
        let (_dir, db_path) = flood_corpus();
        let engine = SearchEngine::keyword_only(&db_path);

        // Even with ai_enabled, no provider means keyword matches only
        let results = engine.search("flooding risk", true).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].article.id, 2);
        assert!(results[0].score.is_none());
        assert!(results[0].relevance.is_none());
    }

    #[test]
    fn test_below_inclusion_threshold_excluded() {
        let (_dir, db_path) = flood_corpus();
        let engine = SearchEngine::new(&db_path, Box::new(FixedEmbedder(query_vector())));

        let results = engine.search("flooding risk", true).unwrap();
        // Article 3 scores ~0.0 against the query vector and never appears
        assert!(results.iter().all(|r| r.article.id != 3));
        assert!(results
            .iter()
            .filter_map(|r| r.score)
            .all(|s| s >= crate::search::relevance::INCLUSION_THRESHOLD));
    }

    #[test]
    fn test_dedup_when_article_matches_both_paths() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("articles.db");
        let store = ArticleStore::open(&db_path).unwrap();

        // Matches the query lexically and carries a perfectly aligned embedding
        store
            .upsert_article(&article(
                7,
                "Flooding risk rises along the river",
                Some(query_vector()),
            ))
            .unwrap();

        let engine = SearchEngine::new(&db_path, Box::new(FixedEmbedder(query_vector())));
        let results = engine.search("flooding risk", true).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].article.id, 7);
        // The semantic entry wins, so the score is kept
        assert!((results[0].score.unwrap() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let (_dir, db_path) = flood_corpus();
        let engine = SearchEngine::new(&db_path, Box::new(DownEmbedder));

        let results = engine.search("quantum basket weaving", true).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_same_inputs_same_results() {
        let (_dir, db_path) = flood_corpus();
        let engine = SearchEngine::new(&db_path, Box::new(FixedEmbedder(query_vector())));

        let first: Vec<i64> = engine
            .search("flooding risk", true)
            .unwrap()
            .iter()
            .map(|r| r.article.id)
            .collect();
        let second: Vec<i64> = engine
            .search("flooding risk", true)
            .unwrap()
            .iter()
            .map(|r| r.article.id)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_k_limits_semantic_candidates() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("articles.db");
        let store = ArticleStore::open(&db_path).unwrap();

        for id in 1..=8 {
            store
                .upsert_article(&article(id, "headline", Some(query_vector())))
                .unwrap();
        }

        let engine = SearchEngine::new(&db_path, Box::new(FixedEmbedder(query_vector())))
            .with_top_k(3);
        let results = engine.search("no lexical match here", true).unwrap();
        assert_eq!(results.len(), 3);
    }
}
