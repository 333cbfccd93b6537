//! Cosine scoring, percentage scaling and the match threshold

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};

/// Cutoff used by every entry point unless the configuration says otherwise.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 30.0;

/// Calculate cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ScreenerError::Processing(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Scale a cosine value to a percentage with two decimals, clamped to 0..=100.
pub fn to_percent(cosine: f32) -> f64 {
    let percent = (f64::from(cosine) * 100.0).clamp(0.0, 100.0);
    (percent * 100.0).round() / 100.0
}

/// Cosine similarity of two embeddings as a rounded percentage.
pub fn similarity_percent(a: &[f32], b: &[f32]) -> Result<f64> {
    cosine_similarity(a, b).map(to_percent)
}

/// `true` when `score_percent` reaches the threshold (inclusive).
pub fn classify(score_percent: f64, threshold_percent: f64) -> bool {
    score_percent >= threshold_percent
}

/// The single threshold value handed to every runner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchThreshold {
    percent: f64,
}

impl MatchThreshold {
    pub fn new(percent: f64) -> Self {
        Self { percent }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn classify(&self, score_percent: f64) -> bool {
        classify(score_percent, self.percent)
    }
}

impl Default for MatchThreshold {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_PERCENT)
    }
}
