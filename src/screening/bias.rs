//! Name-injection probe: score one resume under different candidate names

use crate::error::Result;
use crate::processing::embeddings::{Embedding, EmbeddingProvider};
use crate::processing::similarity::{similarity_percent, MatchThreshold};
use crate::screening::candidate::{rank, ScoredCandidate};
use log::info;

pub const BIAS_CSV: &str = "bias_check_results.csv";
pub const BIAS_CHART: &str = "bias_visualization.png";
pub const BIAS_TITLE: &str = "Bias Check - Resume Score by Simulated Name";

/// Names from diverse backgrounds substituted into the probed resume.
pub const SIMULATED_NAMES: [&str; 10] = [
    "Emily Johnson",
    "Aisha Khan",
    "Wei Zhang",
    "Carlos Gonzalez",
    "Liam Smith",
    "Lakshmi Narayanan",
    "Ahmed El-Sayed",
    "Hiroshi Tanaka",
    "Olga Ivanova",
    "Jamal Washington",
];

/// Replace the first line of the trimmed resume with `name`.
pub fn inject_name(text: &str, name: &str) -> String {
    let mut lines: Vec<&str> = text.trim().lines().collect();
    match lines.first_mut() {
        Some(first) => *first = name,
        None => lines.push(name),
    }
    lines.join("\n")
}

/// Score `resume_text` once per simulated name, ranked by score.
pub async fn simulate_bias(
    provider: &dyn EmbeddingProvider,
    job_embedding: &Embedding,
    resume_text: &str,
    threshold: &MatchThreshold,
) -> Result<Vec<ScoredCandidate>> {
    let mut results = Vec::with_capacity(SIMULATED_NAMES.len());

    for name in SIMULATED_NAMES {
        let modified = inject_name(resume_text, name);
        let embedding = provider.embed(&modified).await?;
        let score = similarity_percent(job_embedding, &embedding)?;
        info!("{:25} - Score: {:.2}%", name, score);
        results.push(ScoredCandidate::new(name, score, threshold));
    }

    rank(&mut results);
    Ok(results)
}

/// Spread between the best and worst scored name, in percentage points.
pub fn score_spread(results: &[ScoredCandidate]) -> f64 {
    let max = results.iter().map(|r| r.score).fold(f64::NEG_INFINITY, f64::max);
    let min = results.iter().map(|r| r.score).fold(f64::INFINITY, f64::min);
    if results.is_empty() {
        0.0
    } else {
        max - min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::parser::{KeywordSkillExtractor, SkillExtractor};
    use crate::test_support::BagOfWords;

    const RESUME: &str = "\n  Jordan Parker\nSkills: Python, SQL, Spark\nExperience: data engineer at Acme\n";

    #[test]
    fn test_inject_name_replaces_first_line_only() {
        let injected = inject_name(RESUME, "Aisha Khan");
        assert_eq!(
            injected,
            "Aisha Khan\nSkills: Python, SQL, Spark\nExperience: data engineer at Acme"
        );
    }

    #[test]
    fn test_inject_name_into_empty_text() {
        assert_eq!(inject_name("   \n ", "Wei Zhang"), "Wei Zhang");
    }

    #[tokio::test]
    async fn test_injection_leaves_skills_unchanged() {
        let extractor = KeywordSkillExtractor;
        let original = extractor.extract_skills(RESUME).await.unwrap();

        for name in SIMULATED_NAMES {
            let injected = extractor.extract_skills(&inject_name(RESUME, name)).await.unwrap();
            assert_eq!(injected, original);
        }
    }

    #[tokio::test]
    async fn test_simulate_bias_scores_every_name_ranked() {
        let provider = BagOfWords;
        let job = provider.embed("python sql spark data engineer").await.unwrap();

        let results = simulate_bias(&provider, &job, RESUME, &MatchThreshold::default())
            .await
            .unwrap();

        assert_eq!(results.len(), SIMULATED_NAMES.len());
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        for name in SIMULATED_NAMES {
            assert!(results.iter().any(|r| r.identifier == name));
        }
        // names are outside the vocabulary, so every score is identical
        assert_eq!(score_spread(&results), 0.0);
        // stable ranking keeps the fixed name order on ties
        assert_eq!(results[0].identifier, SIMULATED_NAMES[0]);
    }
}
