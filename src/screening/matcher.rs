//! Parsed-resume matching: single pair quick match and directory ranking

use crate::error::Result;
use crate::input::manager::{file_name, list_resumes, InputManager};
use crate::processing::embeddings::{Embedding, EmbeddingProvider};
use crate::processing::parser::{ParsedResume, ResumeParser};
use crate::processing::similarity::similarity_percent;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A parsed resume ranked against a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub score: f64,
    pub file: String,
}

/// Result of matching one resume against one job description.
#[derive(Debug, Clone)]
pub struct QuickMatch {
    /// `None` only when similarity could not be computed; 0.0 is a real score
    pub score: Option<f64>,
    pub error: Option<String>,
    pub parsed: ParsedResume,
}

pub async fn quick_match(
    provider: &dyn EmbeddingProvider,
    parser: &ResumeParser,
    input: &mut InputManager,
    resume_path: &Path,
    job_path: &Path,
) -> Result<QuickMatch> {
    let resume_text = input.extract_text(resume_path).await?;
    let job_text = input.read_job_description(job_path).await?;

    let (score, error) = match pair_score(provider, &resume_text, &job_text).await {
        Ok(score) => (Some(score), None),
        Err(e) => {
            warn!("Unable to compute similarity: {}", e);
            (None, Some(e.to_string()))
        }
    };
    let parsed = parser.parse(&resume_text).await?;

    Ok(QuickMatch { score, error, parsed })
}

async fn pair_score(provider: &dyn EmbeddingProvider, resume: &str, job: &str) -> Result<f64> {
    let resume_embedding = provider.embed(resume).await?;
    let job_embedding = provider.embed(job).await?;
    similarity_percent(&job_embedding, &resume_embedding)
}

/// Parse and score every resume in `resume_dir`; resumes that fail are logged and left out.
pub async fn match_resumes(
    provider: &dyn EmbeddingProvider,
    parser: &ResumeParser,
    input: &mut InputManager,
    job_embedding: &Embedding,
    resume_dir: &Path,
) -> Result<Vec<CandidateMatch>> {
    let mut matches = Vec::new();

    for path in list_resumes(resume_dir)? {
        let file = file_name(&path);
        match match_one(provider, parser, input, job_embedding, &path).await {
            Ok((parsed, score)) => {
                info!("{:25} - Score: {:.2}%", file, score);
                matches.push(CandidateMatch {
                    name: parsed.name,
                    email: parsed.email,
                    score,
                    file,
                });
            }
            Err(e) => warn!("Error processing {}: {}", file, e),
        }
    }

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(matches)
}

async fn match_one(
    provider: &dyn EmbeddingProvider,
    parser: &ResumeParser,
    input: &mut InputManager,
    job_embedding: &Embedding,
    path: &Path,
) -> Result<(ParsedResume, f64)> {
    let text = input.extract_text(path).await?;
    let parsed = parser.parse(&text).await?;
    let embedding = provider.embed(&text).await?;
    let score = similarity_percent(job_embedding, &embedding)?;
    Ok((parsed, score))
}
