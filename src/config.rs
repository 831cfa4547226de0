//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.escucha.toml` files.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".escucha.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Article table settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    default_output_for(OutputFormat::Markdown)
}

fn default_output_for(format: OutputFormat) -> String {
    format!("escucha_report.{}", format.extension())
}

/// Location and layout of the article table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the CSV file.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Column holding the candidate identifier.
    #[serde(default = "default_candidate_column")]
    pub candidate_column: String,

    /// Column holding the publish timestamp.
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,

    /// Column holding the sentiment label.
    #[serde(default = "default_sentiment_column")]
    pub sentiment_column: String,

    /// Column holding the cleaned article body.
    #[serde(default = "default_body_column")]
    pub body_column: String,

    /// Label counted as positive.
    #[serde(default = "default_positive_label")]
    pub positive_label: String,

    /// Label counted as negative.
    #[serde(default = "default_negative_label")]
    pub negative_label: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            delimiter: default_delimiter(),
            candidate_column: default_candidate_column(),
            timestamp_column: default_timestamp_column(),
            sentiment_column: default_sentiment_column(),
            body_column: default_body_column(),
            positive_label: default_positive_label(),
            negative_label: default_negative_label(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("dataout/candidates_news.csv")
}

fn default_delimiter() -> char {
    ','
}

fn default_candidate_column() -> String {
    "index".to_string()
}

fn default_timestamp_column() -> String {
    "date_published".to_string()
}

fn default_sentiment_column() -> String {
    "tono".to_string()
}

fn default_body_column() -> String {
    "articleBody_clean".to_string()
}

fn default_positive_label() -> String {
    "positivo".to_string()
}

fn default_negative_label() -> String {
    "negativo".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Maximum number of words listed in the narrative section.
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Words left out of the narrative ranking.
    #[serde(default)]
    pub stopwords: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
            stopwords: Vec::new(),
        }
    }
}

fn default_max_words() -> usize {
    200
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Reject settings the loader cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.dataset.delimiter.is_ascii() {
            anyhow::bail!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.dataset.delimiter
            );
        }
        if self.report.max_words == 0 {
            anyhow::bail!("report.max_words must be at least 1");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.dataset.path = data.clone();
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        } else if self.general.output == default_output() {
            self.general.output = default_output_for(args.format);
        }

        if let Some(max_words) = args.max_words {
            self.report.max_words = max_words;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
