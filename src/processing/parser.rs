//! Resume parsing: contact details, candidate name and skills

use crate::config::{Config, ProviderMode};
use crate::error::Result;
use crate::processing::remote::RemoteEmbedder;
use async_trait::async_trait;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of characters kept as a raw text preview
pub const PREVIEW_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Skills,
    pub raw_text_preview: String,
}

/// Skills as a parsed list or as free text returned by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skills {
    Listed(Vec<String>),
    Summary(String),
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        match self {
            Skills::Listed(items) => items.is_empty(),
            Skills::Summary(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for Skills {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skills::Listed(items) => write!(f, "{}", items.join(", ")),
            Skills::Summary(text) => write!(f, "{}", text),
        }
    }
}

/// Given text, return an optional person name.
pub trait NameExtractor: Send + Sync {
    fn extract_name(&self, text: &str) -> Option<String>;
}

/// Finds a `Name:` label or a leading line shaped like a person's name.
pub struct HeuristicNameExtractor;

const NON_NAME_WORDS: &[&str] = &[
    "resume", "curriculum", "vitae", "cv", "skills", "experience", "education", "summary",
    "profile", "objective", "contact", "projects", "engineer", "developer", "manager",
];

impl NameExtractor for HeuristicNameExtractor {
    fn extract_name(&self, text: &str) -> Option<String> {
        static LABEL: OnceLock<Regex> = OnceLock::new();
        let label = LABEL.get_or_init(|| Regex::new(r"(?im)^\s*name\s*:\s*(.+?)\s*$").expect("static regex"));

        if let Some(caps) = label.captures(text) {
            return Some(caps[1].to_string());
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(5)
            .find(|line| looks_like_name(line))
            .map(str::to_string)
    }
}

fn looks_like_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }

    words.iter().all(|word| {
        let mut chars = word.chars();
        let starts_upper = chars.next().map(char::is_uppercase).unwrap_or(false);
        starts_upper
            && chars.all(|c| c.is_alphabetic() || matches!(c, '\'' | '-' | '.'))
            && !NON_NAME_WORDS.contains(&word.to_lowercase().trim_end_matches(':'))
    })
}

pub fn extract_email(text: &str) -> Option<String> {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("static regex")
    });
    re.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    let re = PHONE.get_or_init(|| Regex::new(r"\+?\d[\d\-\s]{8,}\d").expect("static regex"));
    re.find(text).map(|m| m.as_str().to_string())
}

/// The text after the first `Skills:` label, if any.
pub fn skills_line(text: &str) -> Option<String> {
    text.lines()
        .find(|line| line.to_lowercase().contains("skills:"))
        .and_then(|line| line.split(':').nth(1))
        .map(|rest| rest.trim().to_string())
        .filter(|rest| !rest.is_empty())
}

pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract_skills(&self, text: &str) -> Result<Skills>;
}

/// Splits the resume's `Skills:` line on commas.
pub struct KeywordSkillExtractor;

#[async_trait]
impl SkillExtractor for KeywordSkillExtractor {
    async fn extract_skills(&self, text: &str) -> Result<Skills> {
        let skills = skills_line(text)
            .map(|line| {
                line.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Skills::Listed(skills))
    }
}

/// Asks the remote chat model for the candidate's top skills.
pub struct ChatSkillExtractor {
    client: RemoteEmbedder,
}

impl ChatSkillExtractor {
    pub fn new(client: RemoteEmbedder) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SkillExtractor for ChatSkillExtractor {
    async fn extract_skills(&self, text: &str) -> Result<Skills> {
        let prompt = format!(
            "You are a helpful assistant that extracts professional skills from resumes.\n\
             Given the following resume content, list the top 10 most relevant skills for a job in tech:\n\n\
             {}\n\n\
             Return the skills as a comma-separated list.",
            text
        );
        Ok(Skills::Summary(self.client.complete(&prompt).await?))
    }
}

pub fn build_skill_extractor(config: &Config) -> Result<Box<dyn SkillExtractor>> {
    match config.provider.mode {
        ProviderMode::Local => Ok(Box::new(KeywordSkillExtractor)),
        ProviderMode::Remote => Ok(Box::new(ChatSkillExtractor::new(RemoteEmbedder::new(
            &config.provider.remote,
        )?))),
    }
}

pub struct ResumeParser {
    names: Box<dyn NameExtractor>,
    skills: Box<dyn SkillExtractor>,
}

impl ResumeParser {
    pub fn new(names: Box<dyn NameExtractor>, skills: Box<dyn SkillExtractor>) -> Self {
        Self { names, skills }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Box::new(HeuristicNameExtractor), build_skill_extractor(config)?))
    }

    /// A failing skill extractor degrades to the resume's `Skills:` line.
    pub async fn parse(&self, text: &str) -> Result<ParsedResume> {
        let skills = match self.skills.extract_skills(text).await {
            Ok(skills) => skills,
            Err(e) => {
                warn!("Skill extraction failed, using the Skills line instead: {}", e);
                KeywordSkillExtractor.extract_skills(text).await?
            }
        };

        Ok(ParsedResume {
            name: self.names.extract_name(text),
            email: extract_email(text),
            phone: extract_phone(text),
            skills,
            raw_text_preview: preview(text),
        })
    }
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new(Box::new(HeuristicNameExtractor), Box::new(KeywordSkillExtractor))
    }
}
