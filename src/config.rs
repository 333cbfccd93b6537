//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use crate::processing::similarity::{MatchThreshold, DEFAULT_THRESHOLD_PERCENT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const PROVIDER_ENV: &str = "RESUME_SCREENER_PROVIDER";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    pub screening: ScreeningConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub mode: ProviderMode,
    pub local: LocalModelConfig,
    pub remote: RemoteModelConfig,
}

/// Which embedding backend the process uses. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    Local,
    #[serde(alias = "openai")]
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalModelConfig {
    /// Hugging Face repo id or path to a Model2Vec folder
    pub model: String,
    pub normalize: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteModelConfig {
    pub base_url: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub threshold_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub job_description: PathBuf,
    pub resume_dir: PathBuf,
    pub test_resume_dir: PathBuf,
    pub bias_resume: PathBuf,
    pub output_dir: PathBuf,
    pub ground_truth: PathBuf,
}

impl fmt::Display for ProviderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderMode::Local => write!(f, "local"),
            ProviderMode::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for ProviderMode {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(ProviderMode::Local),
            "remote" | "openai" => Ok(ProviderMode::Remote),
            other => Err(ScreenerError::Configuration(format!(
                "Unsupported embedding provider mode: '{}'. Supported: local, remote",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                mode: ProviderMode::Local,
                local: LocalModelConfig {
                    model: "minishlab/potion-base-8M".to_string(),
                    normalize: true,
                },
                remote: RemoteModelConfig {
                    base_url: "https://api.openai.com/v1".to_string(),
                    embedding_model: "text-embedding-ada-002".to_string(),
                    chat_model: "gpt-3.5-turbo".to_string(),
                    timeout_secs: 60,
                    api_key: None,
                },
            },
            screening: ScreeningConfig {
                threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            },
            paths: PathsConfig {
                job_description: PathBuf::from("data/job_descriptions/sample_jd.txt"),
                resume_dir: PathBuf::from("data/resumes"),
                test_resume_dir: PathBuf::from("data/resumes_test"),
                bias_resume: PathBuf::from("data/resumes/sample_resume.pdf"),
                output_dir: PathBuf::from("output"),
                ground_truth: PathBuf::from("output/ground_truth_labels.json"),
            },
        }
    }
}

impl Config {
    /// Load from `path` or the default location, writing defaults on first use,
    /// then apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(mode) = std::env::var(PROVIDER_ENV) {
            self.provider.mode = mode.parse()?;
        }
        if self.provider.remote.api_key.is_none() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                if !key.trim().is_empty() {
                    self.provider.remote.api_key = Some(key);
                }
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.screening.threshold_percent;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ScreenerError::Configuration(format!(
                "screening.threshold_percent must be within 0..=100, got {}",
                threshold
            )));
        }

        if self.provider.mode == ProviderMode::Remote && self.provider.remote.api_key.is_none() {
            return Err(ScreenerError::Configuration(format!(
                "remote provider selected but no API key configured (set provider.remote.api_key or {})",
                API_KEY_ENV
            )));
        }

        Ok(())
    }

    pub fn threshold(&self) -> MatchThreshold {
        MatchThreshold::new(self.screening.threshold_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.screening.threshold_percent, 30.0);
    }

    #[test]
    fn test_unknown_provider_mode_is_rejected() {
        let text = toml::to_string_pretty(&Config::default())
            .unwrap()
            .replace("mode = \"local\"", "mode = \"quantum\"");

        let err = Config::from_toml(&text).unwrap_err();
        assert!(matches!(err, ScreenerError::Configuration(_)));
        assert!(err.to_string().contains("quantum"));
    }

    #[test]
    fn test_openai_alias_selects_remote() {
        let text = toml::to_string_pretty(&Config::default())
            .unwrap()
            .replace("mode = \"local\"", "mode = \"openai\"");

        let config = Config::from_toml(&text).unwrap();
        assert_eq!(config.provider.mode, ProviderMode::Remote);
    }

    #[test]
    fn test_provider_mode_from_str() {
        assert_eq!("LOCAL".parse::<ProviderMode>().unwrap(), ProviderMode::Local);
        assert_eq!(" remote ".parse::<ProviderMode>().unwrap(), ProviderMode::Remote);
        assert!("gpu".parse::<ProviderMode>().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = Config::default();
        config.screening.threshold_percent = 130.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_api_key_for_remote() {
        let mut config = Config::default();
        config.provider.mode = ProviderMode::Remote;
        assert!(config.validate().is_err());

        config.provider.remote.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_to_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        Config::default().save_to(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(Config::from_toml(&content).unwrap(), Config::default());
    }
}
