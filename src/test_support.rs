//! Deterministic providers shared by unit and integration tests

use crate::error::{Result, ScreenerError};
use crate::processing::embeddings::{Embedding, EmbeddingProvider};
use crate::processing::parser::{SkillExtractor, Skills};
use async_trait::async_trait;

const VOCABULARY: &[&str] = &[
    "python", "sql", "spark", "data", "engineer", "engineering", "machine", "learning", "aws",
    "airflow", "pipelines", "tensorflow", "pytorch", "nlp", "deep", "excel", "customer", "service",
    "support", "testing", "jira", "networking", "entry",
];

/// Counts vocabulary words; anything outside the vocabulary is ignored.
pub struct BagOfWords;

#[async_trait]
impl EmbeddingProvider for BagOfWords {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let mut vector = vec![0.0f32; VOCABULARY.len()];
        for word in text.split(|c: char| !c.is_alphanumeric()) {
            let word = word.to_lowercase();
            if let Some(index) = VOCABULARY.iter().position(|v| *v == word) {
                vector[index] += 1.0;
            }
        }
        Ok(vector)
    }

    fn model_name(&self) -> &str {
        "bag-of-words"
    }
}

/// Fails every call.
pub struct Unavailable;

#[async_trait]
impl EmbeddingProvider for Unavailable {
    async fn embed(&self, _text: &str) -> Result<Embedding> {
        Err(ScreenerError::Network("connection refused".to_string()))
    }

    fn model_name(&self) -> &str {
        "unavailable"
    }
}

#[async_trait]
impl SkillExtractor for Unavailable {
    async fn extract_skills(&self, _text: &str) -> Result<Skills> {
        Err(ScreenerError::Network("connection refused".to_string()))
    }
}
