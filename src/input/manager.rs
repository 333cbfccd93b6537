//! Input manager for handling different file types

use crate::error::{Result, ScreenerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(path) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                debug!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                debug!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                debug!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ScreenerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    /// Read a job description, failing loudly when it is missing or not text.
    pub async fn read_job_description(&mut self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(ScreenerError::InvalidInput(format!(
                "Job description not found: {}",
                path.display()
            )));
        }
        if !FileType::from_path(path).is_job_description() {
            return Err(ScreenerError::UnsupportedFormat(format!(
                "Job description must be a .txt or .md file: {}",
                path.display()
            )));
        }

        let text = self.extract_text(path).await?;
        info!("Loaded job description: {} ({} chars)", path.display(), text.len());
        Ok(text)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// List resume files in `dir`, sorted by file name for reproducible runs.
pub fn list_resumes(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ScreenerError::InvalidInput(format!(
            "Resume directory not found: {}",
            dir.display()
        )));
    }

    let mut resumes = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && FileType::from_path(&path).is_resume() {
            resumes.push(path);
        }
    }

    resumes.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    info!("Found {} resumes in {}", resumes.len(), dir.display());
    Ok(resumes)
}

/// File name used as a candidate identifier.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_resumes_sorts_and_filters() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.pdf", "a.txt", "notes.xyz", "c.md"] {
            std::fs::write(temp_dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(temp_dir.path().join("nested.pdf")).unwrap();

        let names: Vec<String> = list_resumes(temp_dir.path())
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(names, vec!["a.txt", "b.pdf", "c.md"]);
    }

    #[test]
    fn test_list_resumes_missing_directory_is_fatal() {
        let err = list_resumes(Path::new("definitely/not/here")).unwrap_err();
        assert!(err.to_string().contains("Resume directory not found"));
    }

    #[tokio::test]
    async fn test_job_description_must_exist() {
        let mut manager = InputManager::new();
        let result = manager.read_job_description(Path::new("missing_jd.txt")).await;
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_job_description_rejects_pdf() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jd.pdf");
        std::fs::write(&path, "x").unwrap();

        let mut manager = InputManager::new();
        let result = manager.read_job_description(&path).await;
        assert!(matches!(result, Err(ScreenerError::UnsupportedFormat(_))));
    }
}
