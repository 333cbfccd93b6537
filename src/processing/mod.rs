//! Processing module
//! Embedding providers, similarity scoring, resume parsing and evaluation metrics

pub mod embeddings;
pub mod metrics;
pub mod parser;
pub mod remote;
pub mod similarity;

pub use embeddings::{build_provider, Embedding, EmbeddingProvider};
pub use similarity::MatchThreshold;
