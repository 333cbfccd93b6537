//! Scored candidates and ranking

use crate::processing::similarity::MatchThreshold;
use serde::{Deserialize, Serialize};

/// One scored resume: created once per run, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub identifier: String,
    /// Similarity percentage, two decimals
    pub score: f64,
    pub matched: bool,
}

impl ScoredCandidate {
    pub fn new(identifier: impl Into<String>, score: f64, threshold: &MatchThreshold) -> Self {
        Self {
            identifier: identifier.into(),
            score,
            matched: threshold.classify(score),
        }
    }
}

/// Sort by descending score. The sort is stable, so ties keep discovery order.
pub fn rank(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
}
