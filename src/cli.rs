//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::dataset::MonthKey;
use clap::Parser;
use std::path::PathBuf;

/// Escucha - social listening reports for candidate news coverage
///
/// Loads a table of labeled news articles and reports monthly mentions,
/// sentiment shares, two-candidate comparisons and frequent words.
///
/// Examples:
///   escucha --candidate "Ana Pérez"
///   escucha --candidate A --versus B --from 2024-01 --to 2024-06
///   escucha --view narrative --narrative B --format json -o words.json
///   escucha --list
///   escucha --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the article table (CSV)
    ///
    /// Overrides `dataset.path` from the config file.
    #[arg(short, long, value_name = "FILE", env = "ESCUCHA_DATA")]
    pub data: Option<PathBuf>,

    /// Candidate to analyze
    ///
    /// Defaults to the first candidate in the table.
    #[arg(short = 'C', long, value_name = "CANDIDATE")]
    pub candidate: Option<String>,

    /// Second candidate for the comparison view
    ///
    /// Defaults to the first candidate in the table.
    #[arg(long, value_name = "CANDIDATE")]
    pub versus: Option<String>,

    /// Candidate for the word frequency view
    ///
    /// Defaults to --candidate.
    #[arg(long, value_name = "CANDIDATE")]
    pub narrative: Option<String>,

    /// First month of the range (YYYY-MM, inclusive)
    #[arg(long, value_name = "YYYY-MM")]
    pub from: Option<MonthKey>,

    /// Last month of the range (YYYY-MM, inclusive)
    #[arg(long, value_name = "YYYY-MM")]
    pub to: Option<MonthKey>,

    /// Which part of the report to produce
    #[arg(long, default_value = "all", value_name = "VIEW")]
    pub view: View,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .escucha.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of words in the narrative section
    #[arg(long, value_name = "COUNT")]
    pub max_words: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// List candidates and available months, then exit
    #[arg(long)]
    pub list: bool,

    /// Generate a default .escucha.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension used for the default report path.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

/// Report section selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum View {
    /// Every section
    #[default]
    All,
    /// Single-candidate metrics and time series
    Candidate,
    /// Two-candidate comparison
    Compare,
    /// Word frequencies
    Narrative,
}

impl View {
    pub fn includes_candidate(&self) -> bool {
        matches!(self, View::All | View::Candidate)
    }

    pub fn includes_comparison(&self) -> bool {
        matches!(self, View::All | View::Compare)
    }

    pub fn includes_narrative(&self) -> bool {
        matches!(self, View::All | View::Narrative)
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(max_words) = self.max_words {
            if max_words == 0 {
                return Err("Max words must be at least 1".to_string());
            }
        }

        for candidate in [&self.candidate, &self.versus, &self.narrative]
            .into_iter()
            .flatten()
        {
            if candidate.trim().is_empty() {
                return Err("Candidate names cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Whether progress lines and the summary go to stdout.
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
