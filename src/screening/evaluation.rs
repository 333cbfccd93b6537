//! Scores a labelled resume set and measures the classifier against the labels

use crate::error::{Result, ScreenerError};
use crate::processing::embeddings::Embedding;
use crate::processing::metrics::{ClassificationReport, ConfusionMatrix};
use crate::screening::batch::{Screener, SkippedResume};
use crate::screening::candidate::ScoredCandidate;
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::Path;

pub const EVALUATION_CSV: &str = "resume_match_results.csv";
pub const EVALUATION_CHART: &str = "evaluate_visualization.png";
pub const EVALUATION_TITLE: &str = "Resume vs JD Match Scores";

/// File name to label: 1 relevant, 0 not relevant.
pub type GroundTruth = BTreeMap<String, u8>;

pub fn load_ground_truth(path: &Path) -> Result<GroundTruth> {
    if !path.is_file() {
        return Err(ScreenerError::GroundTruthMissing(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let labels: GroundTruth = serde_json::from_str(&content)?;

    if let Some((file, label)) = labels.iter().find(|(_, label)| **label > 1) {
        return Err(ScreenerError::InvalidInput(format!(
            "Label for {} must be 0 or 1, got {}",
            file, label
        )));
    }

    info!("Loaded {} ground truth labels from {}", labels.len(), path.display());
    Ok(labels)
}

pub fn save_ground_truth(labels: &GroundTruth, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(labels)?)?;
    info!("Saved {} labels to {}", labels.len(), path.display());
    Ok(())
}

#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    /// Ranked by score
    pub candidates: Vec<ScoredCandidate>,
    pub matrix: ConfusionMatrix,
    /// `None` when the evaluated labels hold a single class
    pub report: Option<ClassificationReport>,
    /// Labelled files that were not found on disk
    pub missing: Vec<String>,
    pub skipped: Vec<SkippedResume>,
}

/// Score every labelled resume in `resume_dir` and compare predictions with the labels.
pub async fn evaluate(
    screener: &mut Screener<'_>,
    job_embedding: &Embedding,
    resume_dir: &Path,
    labels: &GroundTruth,
) -> Result<EvaluationOutcome> {
    let mut present = Vec::new();
    let mut missing = Vec::new();
    for file in labels.keys() {
        let path = resume_dir.join(file);
        if path.is_file() {
            present.push((file.clone(), path));
        } else {
            warn!("File {} not found, skipping", file);
            missing.push(file.clone());
        }
    }

    let run = screener.screen_named(job_embedding, &present).await?;

    let mut y_true = Vec::with_capacity(run.candidates.len());
    let mut y_pred = Vec::with_capacity(run.candidates.len());
    for candidate in &run.candidates {
        if let Some(label) = labels.get(&candidate.identifier) {
            y_true.push(*label == 1);
            y_pred.push(candidate.matched);
        }
    }

    let matrix = ConfusionMatrix::from_labels(&y_true, &y_pred);
    let report = ClassificationReport::compute(&matrix);
    if report.is_none() {
        warn!("Only one class present in labels, skipping classification report");
    }

    Ok(EvaluationOutcome {
        candidates: run.candidates,
        matrix,
        report,
        missing,
        skipped: run.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::embeddings::EmbeddingProvider;
    use crate::processing::similarity::MatchThreshold;
    use crate::test_support::BagOfWords;
    use tempfile::TempDir;

    const JOB: &str = "python sql spark data engineer";

    async fn setup(files: &[(&str, &str)]) -> (TempDir, Embedding) {
        let temp_dir = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(temp_dir.path().join(name), content).unwrap();
        }
        let job = BagOfWords.embed(JOB).await.unwrap();
        (temp_dir, job)
    }

    fn labels(pairs: &[(&str, u8)]) -> GroundTruth {
        pairs.iter().map(|(f, l)| (f.to_string(), *l)).collect()
    }

    #[tokio::test]
    async fn test_perfect_predictions_have_no_errors() {
        let (temp_dir, job) = setup(&[
            ("resume_1.txt", "Name: Alice Lee\nSkills: Python, SQL, Spark"),
            ("resume_2.txt", "Name: Bob Doe\nSkills: Customer Service, MS Excel"),
        ])
        .await;
        let truth = labels(&[("resume_1.txt", 1), ("resume_2.txt", 0)]);

        let provider = BagOfWords;
        let mut screener = Screener::new(&provider, MatchThreshold::default());
        let outcome = evaluate(&mut screener, &job, temp_dir.path(), &truth).await.unwrap();

        assert_eq!(outcome.matrix.false_positives, 0);
        assert_eq!(outcome.matrix.false_negatives, 0);
        assert_eq!(outcome.matrix.true_positives, 1);
        assert_eq!(outcome.matrix.true_negatives, 1);
        assert_eq!(outcome.report.unwrap().accuracy, 1.0);
        assert_eq!(outcome.candidates[0].identifier, "resume_1.txt");
    }

    #[tokio::test]
    async fn test_missing_files_are_skipped() {
        let (temp_dir, job) = setup(&[("resume_1.txt", "Skills: Python, SQL")]).await;
        let truth = labels(&[("resume_1.txt", 1), ("resume_9.txt", 0)]);

        let provider = BagOfWords;
        let mut screener = Screener::new(&provider, MatchThreshold::default());
        let outcome = evaluate(&mut screener, &job, temp_dir.path(), &truth).await.unwrap();

        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.missing, vec!["resume_9.txt".to_string()]);
        assert_eq!(outcome.matrix.total(), 1);
    }

    #[tokio::test]
    async fn test_single_class_skips_report_but_keeps_matrix() {
        let (temp_dir, job) = setup(&[
            ("resume_1.txt", "Skills: Python, SQL, Spark"),
            ("resume_2.txt", "Skills: Manual Testing"),
        ])
        .await;
        let truth = labels(&[("resume_1.txt", 1), ("resume_2.txt", 1)]);

        let provider = BagOfWords;
        let mut screener = Screener::new(&provider, MatchThreshold::default());
        let outcome = evaluate(&mut screener, &job, temp_dir.path(), &truth).await.unwrap();

        assert!(outcome.report.is_none());
        assert_eq!(outcome.matrix.true_positives, 1);
        assert_eq!(outcome.matrix.false_negatives, 1);
    }

    #[tokio::test]
    async fn test_labels_in_subdirectories_are_evaluated() {
        let (temp_dir, job) = setup(&[("resume_1.txt", "Skills: Python, SQL, Spark")]).await;
        let sub = temp_dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("resume_2.txt"), "Skills: Customer Service").unwrap();
        let truth = labels(&[("resume_1.txt", 1), ("sub/resume_2.txt", 0)]);

        let provider = BagOfWords;
        let mut screener = Screener::new(&provider, MatchThreshold::default());
        let outcome = evaluate(&mut screener, &job, temp_dir.path(), &truth).await.unwrap();

        assert_eq!(outcome.matrix.total(), 2);
        assert_eq!(outcome.matrix.true_negatives, 1);
        assert_eq!(outcome.candidates[1].identifier, "sub/resume_2.txt");
    }

    #[test]
    fn test_missing_ground_truth_points_at_labelling() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_ground_truth(&temp_dir.path().join("ground_truth_labels.json")).unwrap_err();

        assert!(matches!(err, ScreenerError::GroundTruthMissing(_)));
        assert!(err.to_string().contains("resume-screener label"));
    }

    #[test]
    fn test_ground_truth_round_trip_and_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("labels.json");
        let truth = labels(&[("resume_2.pdf", 0), ("resume_1.pdf", 1)]);

        save_ground_truth(&truth, &path).unwrap();
        assert_eq!(load_ground_truth(&path).unwrap(), truth);

        std::fs::write(&path, r#"{"resume_1.pdf": 2}"#).unwrap();
        assert!(matches!(load_ground_truth(&path), Err(ScreenerError::InvalidInput(_))));
    }
}
