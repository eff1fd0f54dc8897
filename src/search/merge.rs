//! Ordered, deduplicated merge of the semantic and lexical result sets.

use serde::Serialize;
use std::collections::HashSet;

use super::relevance::RelevanceTier;
use crate::core::article::Article;

/// One search hit. Ephemeral; never persisted.
///
/// `score` and `relevance` are present only for semantically ranked
/// entries; lexical-only matches carry neither.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub article: Article,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<RelevanceTier>,
}

/// Merge semantic picks and keyword matches into one list.
///
/// Semantic entries come first in their given order, each keeping its
/// score and tier; lexical entries follow in their given order, skipping
/// any article id already present. No article appears twice.
pub fn merge(
    semantic: Vec<(Article, f32, RelevanceTier)>,
    lexical: Vec<Article>,
) -> Vec<SearchResult> {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut results = Vec::with_capacity(semantic.len() + lexical.len());

    for (article, score, tier) in semantic {
        if seen.insert(article.id) {
            results.push(SearchResult {
                article,
                score: Some(score),
                relevance: Some(tier),
            });
        }
    }

    for article in lexical {
        if seen.insert(article.id) {
            results.push(SearchResult {
                article,
                score: None,
                relevance: None,
            });
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64, title: &str) -> Article {
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
            embedding: None,
        }
    }

    #[test]
    fn test_semantic_first_then_unseen_lexical() {
        let semantic = vec![
            (article(1, "a"), 0.9, RelevanceTier::HighlyRelevant),
            (article(2, "b"), 0.6, RelevanceTier::Related),
        ];
        let lexical = vec![article(2, "b"), article(3, "c")];

        let merged = merge(semantic, lexical);
        let ids: Vec<i64> = merged.iter().map(|r| r.article.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        // Article 2 keeps its semantic score despite also matching lexically
        assert_eq!(merged[1].score, Some(0.6));
        assert_eq!(merged[1].relevance, Some(RelevanceTier::Related));

        // Lexical-only entry carries neither score nor tier
        assert!(merged[2].score.is_none());
        assert!(merged[2].relevance.is_none());
    }

    #[test]
    fn test_merge_empty_inputs() {
        assert!(merge(vec![], vec![]).is_empty());

        let lexical_only = merge(vec![], vec![article(5, "e")]);
        assert_eq!(lexical_only.len(), 1);
        assert!(lexical_only[0].score.is_none());
    }

    #[test]
    fn test_no_duplicate_ids() {
        let semantic = vec![
            (article(1, "a"), 0.8, RelevanceTier::HighlyRelevant),
            (article(1, "a"), 0.8, RelevanceTier::HighlyRelevant),
        ];
        let lexical = vec![article(1, "a"), article(1, "a")];

        let merged = merge(semantic, lexical);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].score, Some(0.8));
    }

    #[test]
    fn test_result_serialization_omits_absent_fields() {
        let merged = merge(vec![], vec![article(1, "a")]);
        let json = serde_json::to_value(&merged[0]).unwrap();
        assert!(json.get("score").is_none());
        assert!(json.get("relevance").is_none());
        assert_eq!(json["id"], 1);
    }
}
