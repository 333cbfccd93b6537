//! Resume screener: embedding-based resume screening against a job description

use clap::Parser;
use log::{error, info};
use resume_screener::cli::{self, Cli, Commands, ConfigAction};
use resume_screener::config::Config;
use resume_screener::dashboard::Dashboard;
use resume_screener::error::{Result, ScreenerError};
use resume_screener::input::manager::InputManager;
use resume_screener::output::{console, BarChart, IdentifierColumn, OutputFiles, ResultTable};
use resume_screener::processing::embeddings::{build_provider, EmbeddingProvider};
use resume_screener::processing::parser::ResumeParser;
use resume_screener::screening::batch::{Screener, SCREENING_CHART, SCREENING_CSV, SCREENING_TITLE};
use resume_screener::screening::bias::{score_spread, simulate_bias, BIAS_CHART, BIAS_CSV, BIAS_TITLE};
use resume_screener::screening::evaluation::{
    evaluate, load_ground_truth, EVALUATION_CHART, EVALUATION_CSV, EVALUATION_TITLE,
};
use resume_screener::screening::generator::generate_resumes;
use resume_screener::screening::labeling::label_resumes;
use resume_screener::screening::matcher::{match_resumes, quick_match};
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

const RESUME_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];
const JOB_EXTENSIONS: &[&str] = &["txt", "md"];

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Configuration commands work even when the stored configuration is invalid
    if let Commands::Config { action } = &cli.command {
        if let Err(e) = run_config_command(action.as_ref(), cli.config.clone()) {
            error!("Command failed: {}", e);
            process::exit(1);
        }
        return;
    }

    // Load configuration
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Some(threshold) = cli.threshold {
        config.screening.threshold_percent = threshold;
        if let Err(e) = config.validate() {
            error!("Invalid threshold: {}", e);
            process::exit(1);
        }
    }

    // Execute command
    let start = Instant::now();
    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
    info!("Finished in {:.2?}", start.elapsed());
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    // The provider is chosen once, before any input is read
    let embedder = if command.needs_provider() {
        Some(build_provider(&config)?)
    } else {
        None
    };

    let threshold = config.threshold();
    let paths = &config.paths;
    let mut stdout = io::stdout();

    match command {
        Commands::Screen { job, resumes, output } => {
            let job = job.unwrap_or_else(|| paths.job_description.clone());
            let resumes = resumes.unwrap_or_else(|| paths.resume_dir.clone());
            let output = output.unwrap_or_else(|| paths.output_dir.clone());

            println!("🚀 Screening resumes");
            println!("📂 Resumes: {}", resumes.display());
            println!("💼 Job Description: {}", job.display());

            let mut screener = Screener::new(require(&embedder)?, threshold).with_progress(true);
            let run = screener.screen_directory(&job, &resumes).await?;

            let files = OutputFiles::in_dir(&output, SCREENING_CSV, SCREENING_CHART);
            let table = ResultTable::new(IdentifierColumn::File, run.candidates);
            files.write(&table, &BarChart::new(SCREENING_TITLE).with_threshold(threshold.percent()))?;

            console::write_ranking(&mut stdout, "📊 Screening Results", &table.rows, &threshold)?;
            for skipped in &run.skipped {
                println!("⚠️  Skipped {}: {}", skipped.file, skipped.reason);
            }
            println!("\n📁 Results saved to {}", files.csv.display());
            println!("📊 Visualization saved to {}", files.chart.display());
        }

        Commands::Match { job, resumes } => {
            let job = job.unwrap_or_else(|| paths.job_description.clone());
            let resumes = resumes.unwrap_or_else(|| paths.resume_dir.clone());
            let provider = require(&embedder)?;
            let parser = ResumeParser::from_config(&config)?;

            let mut input = InputManager::new();
            let job_text = input.read_job_description(&job).await?;
            let job_embedding = provider.embed(&job_text).await?;
            let matches = match_resumes(provider, &parser, &mut input, &job_embedding, &resumes).await?;

            println!("\n🎯 Matched Candidates:");
            if matches.is_empty() {
                println!("  (no resumes scored)");
            }
            for candidate in &matches {
                println!(
                    "  {} ({}) - Score: {:.2}% - File: {}",
                    candidate.name.as_deref().unwrap_or("Unknown"),
                    candidate.email.as_deref().unwrap_or("no email"),
                    candidate.score,
                    candidate.file
                );
            }
        }

        Commands::Quick { resume, job } => {
            cli::validate_file_extension(&resume, RESUME_EXTENSIONS)
                .map_err(|e| ScreenerError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, JOB_EXTENSIONS)
                .map_err(|e| ScreenerError::InvalidInput(format!("Job description file: {}", e)))?;

            let parser = ResumeParser::from_config(&config)?;
            let mut input = InputManager::new();
            let result = quick_match(require(&embedder)?, &parser, &mut input, &resume, &job).await?;

            println!("\n📊 Results");
            match result.score {
                Some(score) => {
                    let verdict = if threshold.classify(score) { "✅ match" } else { "❌ no match" };
                    println!("  Resume vs JD Match: {:.2}% ({})", score, verdict);
                }
                None => println!("  Unable to compute similarity in current mode."),
            }
            console::write_parsed(&mut stdout, &result.parsed)?;
        }

        Commands::Parse { resume } => {
            cli::validate_file_extension(&resume, RESUME_EXTENSIONS)
                .map_err(|e| ScreenerError::InvalidInput(format!("Resume file: {}", e)))?;

            let parser = ResumeParser::from_config(&config)?;
            let text = InputManager::new().extract_text(&resume).await?;
            let parsed = parser.parse(&text).await?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }

        Commands::Bias { job, resume, output } => {
            let job = job.unwrap_or_else(|| paths.job_description.clone());
            let resume = resume.unwrap_or_else(|| paths.bias_resume.clone());
            let output = output.unwrap_or_else(|| paths.output_dir.clone());

            println!("🔍 Running bias check on {}", resume.display());

            let mut screener = Screener::new(require(&embedder)?, threshold);
            let job_embedding = screener.embed_job_description(&job).await?;
            let resume_text = screener.input().extract_text(&resume).await?;
            let results = simulate_bias(screener.provider(), &job_embedding, &resume_text, &threshold).await?;

            let files = OutputFiles::in_dir(&output, BIAS_CSV, BIAS_CHART);
            let table = ResultTable::new(IdentifierColumn::Name, results);
            files.write(&table, &BarChart::new(BIAS_TITLE).with_threshold(threshold.percent()))?;

            console::write_ranking(&mut stdout, "📊 Bias Check Results", &table.rows, &threshold)?;
            println!("  Spread between names: {:.2} points", score_spread(&table.rows));
            println!("\n📁 Results saved to {}", files.csv.display());
            println!("📊 Visualization saved to {}", files.chart.display());
        }

        Commands::Label { resumes, labels } => {
            let resumes = resumes.unwrap_or_else(|| paths.test_resume_dir.clone());
            let labels = labels.unwrap_or_else(|| paths.ground_truth.clone());

            let start = Instant::now();
            let stdin = io::stdin();
            label_resumes(&resumes, &labels, &mut stdin.lock(), &mut stdout).await?;
            println!("\n⏱️  Time taken: {:.2?}", start.elapsed());
        }

        Commands::Evaluate { job, resumes, labels, output } => {
            let job = job.unwrap_or_else(|| paths.job_description.clone());
            let resumes = resumes.unwrap_or_else(|| paths.test_resume_dir.clone());
            let labels = labels.unwrap_or_else(|| paths.ground_truth.clone());
            let output = output.unwrap_or_else(|| paths.output_dir.clone());

            let ground_truth = load_ground_truth(&labels)?;
            let mut screener = Screener::new(require(&embedder)?, threshold).with_progress(true);
            let job_embedding = screener.embed_job_description(&job).await?;
            let outcome = evaluate(&mut screener, &job_embedding, &resumes, &ground_truth).await?;

            let files = OutputFiles::in_dir(&output, EVALUATION_CSV, EVALUATION_CHART);
            let table = ResultTable::new(IdentifierColumn::File, outcome.candidates);
            files.write(&table, &BarChart::new(EVALUATION_TITLE).with_threshold(threshold.percent()))?;

            println!("\n📁 Results saved to {}", files.csv.display());
            println!("📊 Evaluation visualization saved to {}", files.chart.display());
            if !outcome.missing.is_empty() {
                println!("⚠️  {} labelled files not found: {}", outcome.missing.len(), outcome.missing.join(", "));
            }

            println!("\n✅ Evaluation Completed!");
            console::write_metrics(&mut stdout, &outcome.matrix, outcome.report.as_ref())?;
        }

        Commands::Generate {
            output,
            count,
            save_labels,
            labels,
        } => {
            let output = output.unwrap_or_else(|| paths.test_resume_dir.clone());
            let labels_path: Option<PathBuf> =
                save_labels.then(|| labels.unwrap_or_else(|| paths.ground_truth.clone()));

            let generated = generate_resumes(&output, count, labels_path.as_deref())?;
            println!("📄 {} synthetic resumes written to {}", generated.len(), output.display());
            if let Some(path) = labels_path {
                println!("🏷️  Labels saved to {}", path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&generated)?);
            }
        }

        Commands::Dashboard => {
            let parser = ResumeParser::from_config(&config)?;
            let dashboard = Dashboard::new(&config, require(&embedder)?, parser);
            let stdin = io::stdin();
            dashboard.run(&mut stdin.lock(), &mut stdout).await?;
        }

        Commands::Config { .. } => unreachable!("config commands run before the configuration is loaded"),
    }

    Ok(())
}

fn require(embedder: &Option<Box<dyn EmbeddingProvider>>) -> Result<&dyn EmbeddingProvider> {
    embedder
        .as_deref()
        .ok_or_else(|| ScreenerError::Configuration("No embedding provider configured".to_string()))
}

fn run_config_command(action: Option<&ConfigAction>, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(Config::default_path);

    match action {
        Some(ConfigAction::Show) | None => {
            let config = Config::load(Some(&path))?;
            let provider = &config.provider;
            println!("⚙️  Current Configuration\n");
            println!("Config File: {}", path.display());
            println!("Provider: {}", provider.mode);
            println!("Local Model: {} (normalize: {})", provider.local.model, provider.local.normalize);
            println!("Remote API: {}", provider.remote.base_url);
            println!("  Embedding Model: {}", provider.remote.embedding_model);
            println!("  Chat Model: {}", provider.remote.chat_model);
            println!("  Timeout: {}s", provider.remote.timeout_secs);
            println!(
                "  API Key: {}",
                if provider.remote.api_key.is_some() { "set" } else { "not set" }
            );
            println!("\nMatch Threshold: {:.1}%", config.screening.threshold_percent);
            println!("\nPaths:");
            println!("  Job Description: {}", config.paths.job_description.display());
            println!("  Resumes: {}", config.paths.resume_dir.display());
            println!("  Test Resumes: {}", config.paths.test_resume_dir.display());
            println!("  Bias Resume: {}", config.paths.bias_resume.display());
            println!("  Output: {}", config.paths.output_dir.display());
            println!("  Ground Truth: {}", config.paths.ground_truth.display());
        }

        Some(ConfigAction::Reset) => {
            println!("🔄 Resetting configuration to defaults...");
            Config::default().save_to(&path)?;
            println!("✅ Configuration reset successfully!");
        }

        Some(ConfigAction::Path) => println!("{}", path.display()),
    }

    Ok(())
}
