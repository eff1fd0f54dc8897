//! Relevance tiers derived from semantic similarity scores.

use serde::{Deserialize, Serialize};

/// Scores at or above this are highly relevant.
pub const HIGHLY_RELEVANT_THRESHOLD: f32 = 0.70;

/// Scores below this are excluded from semantic results entirely.
pub const INCLUSION_THRESHOLD: f32 = 0.50;

/// Discrete relevance label for a semantically ranked result.
///
/// Serialized with the display labels the result cards expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelevanceTier {
    #[serde(rename = "Highly Relevant")]
    HighlyRelevant,
    #[serde(rename = "Related")]
    Related,
}

/// Map a similarity score to a tier.
///
/// Returns None below the inclusion threshold; the caller drops those
/// results. A "General" tier for the sub-0.50 band exists conceptually
/// but is unreachable under the current inclusion policy.
pub fn classify(score: f32) -> Option<RelevanceTier> {
    if score >= HIGHLY_RELEVANT_THRESHOLD {
        Some(RelevanceTier::HighlyRelevant)
    } else if score >= INCLUSION_THRESHOLD {
        Some(RelevanceTier::Related)
    } else {
        None
    }
}
