//! Embedding providers: one contract, a local Model2Vec backend and a remote API backend

use crate::config::{Config, LocalModelConfig, ProviderMode};
use crate::error::{Result, ScreenerError};
use crate::processing::remote::RemoteEmbedder;
use async_trait::async_trait;
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::time::Instant;

/// A fixed-length embedding vector
pub type Embedding = Vec<f32>;

/// Maps text to a fixed-size vector. Callers never care which backend is behind it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

/// Build the provider selected by configuration.
pub fn build_provider(config: &Config) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.mode {
        ProviderMode::Local => Ok(Box::new(LocalEmbedder::load(&config.provider.local)?)),
        ProviderMode::Remote => Ok(Box::new(RemoteEmbedder::new(&config.provider.remote)?)),
    }
}

pub struct LocalEmbedder {
    model: StaticModel,
    model_name: String,
}

impl LocalEmbedder {
    pub fn load(local: &LocalModelConfig) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model: {}", local.model);

        let model = StaticModel::from_pretrained(
            &local.model,
            None, // token
            Some(local.normalize),
            None, // subfolder
        )
        .map_err(|e| ScreenerError::Embedding(format!("Failed to load model '{}': {}", local.model, e)))?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: local.model.clone(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let start_time = Instant::now();
        let embedding = self.model.encode_single(text);
        debug!(
            "Embedded {} chars into {} dims in {:.2?}",
            text.len(),
            embedding.len(),
            start_time.elapsed()
        );

        if embedding.is_empty() {
            return Err(ScreenerError::Embedding(format!(
                "Model '{}' returned an empty embedding",
                self.model_name
            )));
        }
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::similarity::similarity_percent;

    fn potion() -> LocalEmbedder {
        LocalEmbedder::load(&Config::default().provider.local).unwrap()
    }

    #[tokio::test]
    #[ignore = "downloads minishlab/potion-base-8M from the Hugging Face hub"]
    async fn test_local_embeddings_are_fixed_length_and_deterministic() {
        let embedder = potion();
        let a = embedder.embed("Python data engineer").await.unwrap();
        let b = embedder.embed("Python data engineer").await.unwrap();
        let c = embedder.embed("A much longer sentence about customer service and spreadsheets").await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), c.len());
    }

    #[tokio::test]
    #[ignore = "downloads minishlab/potion-base-8M from the Hugging Face hub"]
    async fn test_skill_overlap_separates_relevant_from_irrelevant() {
        let embedder = potion();
        let jd = embedder
            .embed("Looking for a Python data engineer with SQL and Spark experience.")
            .await
            .unwrap();
        let relevant = embedder.embed("Python, SQL, Spark").await.unwrap();
        let irrelevant = embedder.embed("Customer service and MS Excel").await.unwrap();

        assert!(similarity_percent(&jd, &relevant).unwrap() > 80.0);
        assert!(similarity_percent(&jd, &irrelevant).unwrap() < 30.0);
    }
}
