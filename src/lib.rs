//! Resume screener library

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod screening;

#[doc(hidden)]
pub mod test_support;

pub use config::Config;
pub use error::{Result, ScreenerError};
pub use processing::{build_provider, Embedding, EmbeddingProvider, MatchThreshold};
pub use screening::{Screener, ScoredCandidate};
