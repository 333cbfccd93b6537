//! Error handling for the resume screener

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote API error (status {status}): {message}")]
    RemoteApi { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Ground truth labels not found at {}. Run `resume-screener label` first.",
        .0.display()
    )]
    GroundTruthMissing(PathBuf),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Model2Vec reports load failures through anyhow
impl From<anyhow::Error> for ScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ScreenerError::Embedding(err.to_string())
    }
}

impl From<reqwest::Error> for ScreenerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScreenerError::Network(format!("request timed out: {}", err))
        } else {
            ScreenerError::Network(err.to_string())
        }
    }
}
