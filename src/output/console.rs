//! Console presentation of screening results

use crate::output::table::{MATCH_MARKER, NO_MATCH_MARKER};
use crate::processing::metrics::{ClassificationReport, ConfusionMatrix};
use crate::processing::parser::ParsedResume;
use crate::processing::similarity::MatchThreshold;
use crate::screening::candidate::ScoredCandidate;
use colored::Colorize;
use std::io::Write;

pub fn write_ranking<W: Write>(
    out: &mut W,
    title: &str,
    rows: &[ScoredCandidate],
    threshold: &MatchThreshold,
) -> std::io::Result<()> {
    writeln!(out, "\n{}", title.bold())?;
    if rows.is_empty() {
        writeln!(out, "  (no resumes scored)")?;
        return Ok(());
    }

    let width = rows.iter().map(|r| r.identifier.chars().count()).max().unwrap_or(0).max(25);
    for (rank, row) in rows.iter().enumerate() {
        let score = format!("{:>6.2}%", row.score);
        let (score, marker) = if row.matched {
            (score.green(), MATCH_MARKER)
        } else {
            (score.red(), NO_MATCH_MARKER)
        };
        writeln!(
            out,
            "  {:>2}. {:<width$}  {} {}",
            rank + 1,
            row.identifier,
            score,
            marker,
            width = width
        )?;
    }

    let matched = rows.iter().filter(|r| r.matched).count();
    writeln!(
        out,
        "  {} of {} at or above the {:.1}% threshold",
        matched,
        rows.len(),
        threshold.percent()
    )
}

pub fn write_metrics<W: Write>(
    out: &mut W,
    matrix: &ConfusionMatrix,
    report: Option<&ClassificationReport>,
) -> std::io::Result<()> {
    match report {
        Some(report) => {
            writeln!(out, "\n{}", "Classification Report:".bold())?;
            write!(out, "{}", report)?;
        }
        None => {
            writeln!(
                out,
                "\n{}",
                "Only one class present in labels, skipping classification report.".yellow()
            )?;
        }
    }

    writeln!(out, "\n{}", "Confusion Matrix:".bold())?;
    writeln!(out, "{}", matrix)
}

pub fn write_parsed<W: Write>(out: &mut W, parsed: &ParsedResume) -> std::io::Result<()> {
    let missing = || "not found".dimmed().to_string();
    writeln!(out, "\n{}", "Extracted Resume Info".bold())?;
    writeln!(out, "  Name:   {}", parsed.name.clone().unwrap_or_else(missing))?;
    writeln!(out, "  Email:  {}", parsed.email.clone().unwrap_or_else(missing))?;
    writeln!(out, "  Phone:  {}", parsed.phone.clone().unwrap_or_else(missing))?;
    if parsed.skills.is_empty() {
        writeln!(out, "  Skills: {}", missing())
    } else {
        writeln!(out, "  Skills: {}", parsed.skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::parser::Skills;

    #[test]
    fn test_write_ranking_lists_every_row() {
        let threshold = MatchThreshold::default();
        let rows = vec![
            ScoredCandidate::new("resume_2.pdf", 64.2, &threshold),
            ScoredCandidate::new("resume_1.pdf", 12.0, &threshold),
        ];

        let mut out = Vec::new();
        write_ranking(&mut out, "Ranking", &rows, &threshold).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("1. resume_2.pdf"));
        assert!(text.contains("2. resume_1.pdf"));
        assert!(text.contains("1 of 2 at or above the 30.0% threshold"));
    }

    #[test]
    fn test_write_metrics_without_report_still_prints_matrix() {
        let matrix = ConfusionMatrix::from_labels(&[true, true], &[true, false]);
        let mut out = Vec::new();
        write_metrics(&mut out, &matrix, None).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("skipping classification report"));
        assert!(text.contains("[[0 0]\n [1 1]]"));
    }

    #[test]
    fn test_write_parsed_marks_missing_fields() {
        let parsed = ParsedResume {
            name: Some("Olga Ivanova".into()),
            email: None,
            phone: None,
            skills: Skills::Listed(vec!["Python".into(), "SQL".into()]),
            raw_text_preview: String::new(),
        };
        let mut out = Vec::new();
        write_parsed(&mut out, &parsed).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Olga Ivanova"));
        assert!(text.contains("Python, SQL"));
        assert!(text.contains("not found"));
    }
}
