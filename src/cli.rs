//! CLI interface for the resume screener

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Embedding-based resume screening against a job description")]
#[command(long_about = "Score resumes against a job description with sentence embeddings, \
    classify them with a similarity threshold, probe for name bias and evaluate against hand labels")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Match threshold in percent, overriding the configuration
    #[arg(short, long, global = true)]
    pub threshold: Option<f64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Screen every resume in a directory against a job description
    Screen {
        /// Job description file (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Directory of resumes (PDF, TXT, MD)
        #[arg(short, long)]
        resumes: Option<PathBuf>,

        /// Directory for the CSV and chart
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse and rank resumes, showing name and email
    Match {
        /// Job description file (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Directory of resumes (PDF, TXT, MD)
        #[arg(short, long)]
        resumes: Option<PathBuf>,
    },

    /// Score a single resume against a job description
    Quick {
        /// Resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,
    },

    /// Extract contact details and skills from a resume as JSON
    Parse {
        /// Resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,
    },

    /// Score one resume under a set of simulated candidate names
    Bias {
        /// Job description file (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Resume to probe (PDF, TXT, MD)
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Directory for the CSV and chart
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Label resumes as relevant or not, building the ground truth file
    Label {
        /// Directory of resumes to label
        #[arg(short, long)]
        resumes: Option<PathBuf>,

        /// Ground truth file to write
        #[arg(short, long)]
        labels: Option<PathBuf>,
    },

    /// Compare threshold predictions with the ground truth labels
    Evaluate {
        /// Job description file (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Directory of labelled resumes
        #[arg(short, long)]
        resumes: Option<PathBuf>,

        /// Ground truth file
        #[arg(short, long)]
        labels: Option<PathBuf>,

        /// Directory for the CSV and chart
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate synthetic PDF resumes with known labels
    Generate {
        /// Directory to write the resumes to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of resumes
        #[arg(short = 'n', long, default_value_t = 50)]
        count: usize,

        /// Also write the generated labels as ground truth
        #[arg(long)]
        save_labels: bool,

        /// Ground truth file used with --save-labels
        #[arg(short, long)]
        labels: Option<PathBuf>,
    },

    /// Interactive terminal dashboard
    Dashboard,

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

impl Commands {
    /// Whether the command needs an embedding provider.
    pub fn needs_provider(&self) -> bool {
        matches!(
            self,
            Commands::Screen { .. }
                | Commands::Match { .. }
                | Commands::Quick { .. }
                | Commands::Bias { .. }
                | Commands::Evaluate { .. }
                | Commands::Dashboard
        )
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
