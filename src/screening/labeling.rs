//! Interactive ground-truth authoring

use crate::error::{Result, ScreenerError};
use crate::input::manager::{file_name, list_resumes, InputManager};
use crate::processing::parser::skills_line;
use crate::screening::evaluation::{save_ground_truth, GroundTruth};
use colored::Colorize;
use log::warn;
use std::io::{BufRead, Write};
use std::path::Path;

/// Characters of resume text shown next to each prompt
const LABEL_PREVIEW_CHARS: usize = 300;

/// Ask for a relevance label per resume in `resume_dir`, then write the labels to `output`.
pub async fn label_resumes<R: BufRead, W: Write>(
    resume_dir: &Path,
    output: &Path,
    input: &mut R,
    out: &mut W,
) -> Result<GroundTruth> {
    let mut manager = InputManager::new().with_cache(false);
    let mut labels = GroundTruth::new();

    writeln!(out, "\nLoading resumes...")?;
    for path in list_resumes(resume_dir)? {
        let name = file_name(&path);
        let text = match manager.extract_text(&path).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Error processing {}: {}", name, e);
                continue;
            }
        };

        writeln!(out, "\n{}", "-".repeat(30))?;
        writeln!(out, "File: {}", name.bold())?;
        writeln!(
            out,
            "Skills: {}",
            skills_line(&text).unwrap_or_else(|| "No skills found".to_string())
        )?;
        let snippet: String = text.trim().chars().take(LABEL_PREVIEW_CHARS).collect();
        writeln!(out, "{}", snippet.dimmed())?;

        let relevant = ask_relevance(input, out)?;
        labels.insert(name, u8::from(relevant));
    }

    save_ground_truth(&labels, output)?;
    writeln!(out, "\nLabeling completed! Saved to {}", output.display())?;
    Ok(labels)
}

/// Re-asks until the answer is `y` or `n`.
fn ask_relevance<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<bool> {
    loop {
        write!(out, "Is this resume relevant to the Job Description? (y/n): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ScreenerError::InvalidInput(
                "Input closed before every resume was labelled".to_string(),
            ));
        }

        match line.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => writeln!(out, "Invalid input. Please type 'y' or 'n'.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::evaluation::load_ground_truth;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn resume_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("resume_1.txt"), "Name: Alice Lee\nSkills: Python, SQL").unwrap();
        std::fs::write(temp_dir.path().join("resume_2.txt"), "Name: Bob Doe\nSkills: JIRA").unwrap();
        temp_dir
    }

    #[tokio::test]
    async fn test_labels_are_collected_and_saved() {
        let dir = resume_dir();
        let output = dir.path().join("out").join("ground_truth_labels.json");
        let mut input = Cursor::new("y\nmaybe\nN\n");
        let mut out = Vec::new();

        let labels = label_resumes(dir.path(), &output, &mut input, &mut out).await.unwrap();

        assert_eq!(labels.get("resume_1.txt"), Some(&1));
        assert_eq!(labels.get("resume_2.txt"), Some(&0));
        assert_eq!(load_ground_truth(&output).unwrap(), labels);

        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("Skills: Python, SQL"));
        assert!(transcript.contains("Invalid input. Please type 'y' or 'n'."));
    }

    #[tokio::test]
    async fn test_closed_input_is_an_error() {
        let dir = resume_dir();
        let output = dir.path().join("labels.json");
        let mut input = Cursor::new("y\n");
        let mut out = Vec::new();

        let result = label_resumes(dir.path(), &output, &mut input, &mut out).await;

        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
        assert!(!output.exists());
    }
}
