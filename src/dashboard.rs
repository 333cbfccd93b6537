//! Interactive terminal dashboard

use crate::config::Config;
use crate::error::Result;
use crate::input::manager::InputManager;
use crate::output::{console, BarChart, IdentifierColumn, OutputFiles, ResultTable};
use crate::processing::embeddings::EmbeddingProvider;
use crate::processing::parser::ResumeParser;
use crate::screening::batch::{Screener, SCREENING_CHART, SCREENING_CSV, SCREENING_TITLE};
use crate::screening::bias::BIAS_CHART;
use crate::screening::evaluation::EVALUATION_CHART;
use crate::screening::matcher::quick_match;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    BatchScreening,
    QuickMatch,
    Visualizations,
    DownloadResults,
    Settings,
    Quit,
}

impl Section {
    pub const MENU: [Section; 7] = [
        Section::Home,
        Section::BatchScreening,
        Section::QuickMatch,
        Section::Visualizations,
        Section::DownloadResults,
        Section::Settings,
        Section::Quit,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::BatchScreening => "Batch Resume Screening",
            Section::QuickMatch => "Quick Match (Resume & JD)",
            Section::Visualizations => "Visualizations",
            Section::DownloadResults => "Download Results",
            Section::Settings => "Settings",
            Section::Quit => "Quit",
        }
    }

    /// Accepts the menu number, or `q` for quit.
    pub fn from_choice(choice: &str) -> Option<Self> {
        let choice = choice.trim().to_lowercase();
        if choice == "q" || choice == "quit" {
            return Some(Section::Quit);
        }
        choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| Self::MENU.get(index).copied())
    }
}

pub struct Dashboard<'a> {
    config: &'a Config,
    provider: &'a dyn EmbeddingProvider,
    parser: ResumeParser,
}

impl<'a> Dashboard<'a> {
    pub fn new(config: &'a Config, provider: &'a dyn EmbeddingProvider, parser: ResumeParser) -> Self {
        Self {
            config,
            provider,
            parser,
        }
    }

    /// Show the menu until the user quits or input ends.
    pub async fn run<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", "AI-Powered Resume Screener".bold())?;

        loop {
            writeln!(out)?;
            for (index, section) in Section::MENU.iter().enumerate() {
                writeln!(out, "  {}. {}", index + 1, section.title())?;
            }

            let Some(choice) = prompt(input, out, "Go to")? else {
                return Ok(());
            };

            match Section::from_choice(&choice) {
                Some(Section::Quit) => return Ok(()),
                Some(section) => {
                    writeln!(out, "\n{}", section.title().bold().underline())?;
                    // a failed section is reported and the menu is shown again
                    if let Err(e) = self.show(section, input, out).await {
                        writeln!(out, "{}", e.to_string().red())?;
                    }
                }
                None => writeln!(out, "{}", format!("Unknown choice '{}'", choice.trim()).yellow())?,
            }
        }
    }

    async fn show<R: BufRead, W: Write>(&self, section: Section, input: &mut R, out: &mut W) -> Result<()> {
        match section {
            Section::Home => self.home(out),
            Section::BatchScreening => self.batch_screening(out).await,
            Section::QuickMatch => self.quick_match(input, out).await,
            Section::Visualizations => self.visualizations(out),
            Section::DownloadResults => self.download_results(out),
            Section::Settings => self.settings(out),
            Section::Quit => Ok(()),
        }
    }

    fn home<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "This tool allows you to:")?;
        writeln!(out, "  - Match resumes to job descriptions")?;
        writeln!(out, "  - Visualize screening results")?;
        writeln!(out, "  - Perform quick one-off resume matches")?;
        writeln!(out, "  - Evaluate model performance")?;
        writeln!(out, "Supports a local Model2Vec model and OpenAI-compatible embedding APIs.")?;
        Ok(())
    }

    async fn batch_screening<W: Write>(&self, out: &mut W) -> Result<()> {
        let paths = &self.config.paths;
        if !paths.job_description.is_file() || !paths.resume_dir.is_dir() {
            writeln!(out, "{}", "Job description or resumes not found!".red())?;
            return Ok(());
        }

        writeln!(out, "Screening started...")?;
        let threshold = self.config.threshold();
        let mut screener = Screener::new(self.provider, threshold);
        let run = screener.screen_directory(&paths.job_description, &paths.resume_dir).await?;

        let files = OutputFiles::in_dir(&paths.output_dir, SCREENING_CSV, SCREENING_CHART);
        let table = ResultTable::new(IdentifierColumn::File, run.candidates);
        files.write(&table, &BarChart::new(SCREENING_TITLE).with_threshold(threshold.percent()))?;

        console::write_ranking(out, "Screening completed!", &table.rows, &threshold)?;
        writeln!(out, "Results saved to {}", files.csv.display())?;
        Ok(())
    }

    async fn quick_match<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<()> {
        let resume = prompt(input, out, "Resume path (PDF, TXT, MD)")?.unwrap_or_default();
        let job = prompt(input, out, "Job description path (TXT, MD)")?.unwrap_or_default();
        if resume.trim().is_empty() || job.trim().is_empty() {
            writeln!(out, "{}", "Please provide both a resume and a JD.".red())?;
            return Ok(());
        }

        let mut manager = InputManager::new();
        let result = quick_match(
            self.provider,
            &self.parser,
            &mut manager,
            Path::new(resume.trim()),
            Path::new(job.trim()),
        )
        .await?;

        writeln!(out, "\n{}", "Results".bold())?;
        match result.score {
            Some(score) => writeln!(out, "  Resume vs JD Match: {:.2}%", score)?,
            None => writeln!(out, "{}", "Unable to compute similarity in current mode.".red())?,
        }
        console::write_parsed(out, &result.parsed)?;
        Ok(())
    }

    fn visualizations<W: Write>(&self, out: &mut W) -> Result<()> {
        let charts = [
            (SCREENING_CHART, "Screening Results", "No screening chart found yet."),
            (BIAS_CHART, "Bias Evaluation Results", "No bias visualization chart available yet."),
            (EVALUATION_CHART, "Evaluation Results", "No evaluation chart found yet."),
        ];
        for (file, caption, absent) in charts {
            let path = self.output_path(file);
            if path.is_file() {
                writeln!(out, "  {}: {}", caption, path.display())?;
            } else {
                writeln!(out, "  {}", absent.dimmed())?;
            }
        }
        Ok(())
    }

    fn download_results<W: Write>(&self, out: &mut W) -> Result<()> {
        let path = self.output_path(SCREENING_CSV);
        if !path.is_file() {
            writeln!(out, "No screening results to download.")?;
            return Ok(());
        }
        writeln!(out, "{}", path.display())?;
        write!(out, "{}", std::fs::read_to_string(&path)?)?;
        Ok(())
    }

    fn settings<W: Write>(&self, out: &mut W) -> Result<()> {
        let provider = &self.config.provider;
        writeln!(out, "  Model Provider: {}", provider.mode)?;
        writeln!(out, "  Embedding Model: {}", self.provider.model_name())?;
        writeln!(out, "  Match Threshold: {:.1}%", self.config.screening.threshold_percent)?;
        writeln!(out, "  Output Directory: {}", self.config.paths.output_dir.display())?;
        writeln!(
            out,
            "{}",
            "To switch models, edit the configuration file (resume-screener config path).".dimmed()
        )?;
        Ok(())
    }

    fn output_path(&self, file: &str) -> PathBuf {
        self.config.paths.output_dir.join(file)
    }
}

/// `None` once input is exhausted.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{}: ", label)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
