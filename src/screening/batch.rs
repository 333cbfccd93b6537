//! Batch runner: embed the job description once, then score every resume in turn

use crate::error::{Result, ScreenerError};
use crate::input::manager::{file_name, list_resumes, InputManager};
use crate::processing::embeddings::{Embedding, EmbeddingProvider};
use crate::processing::similarity::{similarity_percent, MatchThreshold};
use crate::screening::candidate::{rank, ScoredCandidate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};

pub const SCREENING_CSV: &str = "real_resume_screening_results.csv";
pub const SCREENING_CHART: &str = "real_screening_visualization.png";
pub const SCREENING_TITLE: &str = "Real Resume Screening - Score vs JD";

/// A resume that could not be read and was left out of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedResume {
    pub file: String,
    pub reason: String,
}

/// Ranked results of one batch run.
#[derive(Debug, Clone, Default)]
pub struct ScreeningRun {
    pub candidates: Vec<ScoredCandidate>,
    pub skipped: Vec<SkippedResume>,
}

pub struct Screener<'a> {
    provider: &'a dyn EmbeddingProvider,
    threshold: MatchThreshold,
    input: InputManager,
    show_progress: bool,
}

impl<'a> Screener<'a> {
    pub fn new(provider: &'a dyn EmbeddingProvider, threshold: MatchThreshold) -> Self {
        Self {
            provider,
            threshold,
            // each file is read once per run
            input: InputManager::new().with_cache(false),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn provider(&self) -> &'a dyn EmbeddingProvider {
        self.provider
    }

    pub fn input(&mut self) -> &mut InputManager {
        &mut self.input
    }

    pub async fn embed_job_description(&mut self, path: &Path) -> Result<Embedding> {
        let text = self.input.read_job_description(path).await?;
        self.provider.embed(&text).await
    }

    /// Score one text against an already embedded job description.
    pub async fn score_text(&self, job_embedding: &Embedding, text: &str) -> Result<f64> {
        let embedding = self.provider.embed(text).await?;
        similarity_percent(job_embedding, &embedding)
    }

    /// Screen every resume in `resume_dir` against the job description at `job_path`.
    pub async fn screen_directory(&mut self, job_path: &Path, resume_dir: &Path) -> Result<ScreeningRun> {
        let job_embedding = self.embed_job_description(job_path).await?;
        let resumes = list_resumes(resume_dir)?;
        self.screen_files(&job_embedding, &resumes).await
    }

    /// Screen `files`, identifying each candidate by its file name.
    pub async fn screen_files(&mut self, job_embedding: &Embedding, files: &[PathBuf]) -> Result<ScreeningRun> {
        let named: Vec<(String, PathBuf)> = files.iter().map(|path| (file_name(path), path.clone())).collect();
        self.screen_named(job_embedding, &named).await
    }

    /// Screen `(identifier, path)` pairs.
    /// Unreadable resumes are logged and skipped; embedding failures abort the run.
    pub async fn screen_named(
        &mut self,
        job_embedding: &Embedding,
        files: &[(String, PathBuf)],
    ) -> Result<ScreeningRun> {
        let progress = self.progress_bar(files.len());
        let mut run = ScreeningRun::default();

        for (name, path) in files {
            let name = name.clone();
            progress.set_message(name.clone());

            match self.input.extract_text(path).await {
                Ok(text) => {
                    let score = self.score_text(job_embedding, &text).await?;
                    info!("{:25} - Score: {:.2}%", name, score);
                    run.candidates.push(ScoredCandidate::new(name, score, &self.threshold));
                }
                Err(e @ (ScreenerError::PdfExtraction(_) | ScreenerError::Io(_))) => {
                    warn!("Error processing {}: {}", name, e);
                    run.skipped.push(SkippedResume {
                        file: name,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        rank(&mut run.candidates);
        Ok(run)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::BagOfWords;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_screen_directory_ranks_and_skips_corrupt_pdf() {
        let temp_dir = TempDir::new().unwrap();
        let jd = write(temp_dir.path(), "jd.txt", b"python sql spark data engineer");
        let resumes = temp_dir.path().join("resumes");
        std::fs::create_dir(&resumes).unwrap();
        write(&resumes, "b_partial.txt", b"python excel");
        write(&resumes, "a_strong.txt", b"python sql spark data engineer");
        write(&resumes, "c_none.txt", b"customer service");
        write(&resumes, "d_broken.pdf", b"not really a pdf");

        let provider = BagOfWords;
        let mut screener = Screener::new(&provider, MatchThreshold::default());
        let run = screener.screen_directory(&jd, &resumes).await.unwrap();

        let order: Vec<&str> = run.candidates.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(order, vec!["a_strong.txt", "b_partial.txt", "c_none.txt"]);
        assert_eq!(run.candidates[0].score, 100.0);
        assert!(run.candidates[0].matched);
        assert_eq!(run.candidates[2].score, 0.0);
        assert!(!run.candidates[2].matched);

        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].file, "d_broken.pdf");
    }

    #[tokio::test]
    async fn test_empty_resume_directory_yields_empty_run() {
        let temp_dir = TempDir::new().unwrap();
        let jd = write(temp_dir.path(), "jd.txt", b"python");
        let resumes = temp_dir.path().join("resumes");
        std::fs::create_dir(&resumes).unwrap();

        let provider = BagOfWords;
        let mut screener = Screener::new(&provider, MatchThreshold::default());
        let run = screener.screen_directory(&jd, &resumes).await.unwrap();

        assert!(run.candidates.is_empty());
        assert!(run.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_missing_job_description_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let provider = BagOfWords;
        let mut screener = Screener::new(&provider, MatchThreshold::default());

        let result = screener
            .screen_directory(&temp_dir.path().join("missing.txt"), temp_dir.path())
            .await;
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_empty_resume_text_scores_zero() {
        let temp_dir = TempDir::new().unwrap();
        let jd = write(temp_dir.path(), "jd.txt", b"python");
        let resumes = temp_dir.path().join("resumes");
        std::fs::create_dir(&resumes).unwrap();
        write(&resumes, "blank.txt", b"");

        let provider = BagOfWords;
        let mut screener = Screener::new(&provider, MatchThreshold::default());
        let run = screener.screen_directory(&jd, &resumes).await.unwrap();

        assert_eq!(run.candidates.len(), 1);
        assert_eq!(run.candidates[0].score, 0.0);
    }
}
