//! CSV loader for the article table.
//!
//! Reads the configured columns, strips any timezone offset from the
//! publish timestamp, and caches the distinct candidates and months.

use crate::dataset::{MonthKey, MonthRange};
use crate::error::DataLoadError;
use crate::models::{Article, Sentiment};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Column names and label spellings of the article table.
#[derive(Debug, Clone)]
pub struct Schema {
    pub candidate_column: String,
    pub timestamp_column: String,
    pub sentiment_column: String,
    pub body_column: String,
    pub positive_label: String,
    pub negative_label: String,
    pub delimiter: u8,
}

impl Default for Schema {
    fn default() -> Self {
        Self::from(&crate::config::DatasetConfig::default())
    }
}

impl From<&crate::config::DatasetConfig> for Schema {
    fn from(config: &crate::config::DatasetConfig) -> Self {
        Self {
            candidate_column: config.candidate_column.clone(),
            timestamp_column: config.timestamp_column.clone(),
            sentiment_column: config.sentiment_column.clone(),
            body_column: config.body_column.clone(),
            positive_label: config.positive_label.clone(),
            negative_label: config.negative_label.clone(),
            delimiter: config.delimiter as u8,
        }
    }
}

/// Positions of the required columns in the header row.
struct ColumnIndex {
    candidate: usize,
    timestamp: usize,
    sentiment: usize,
    body: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, schema: &Schema) -> Result<Self, DataLoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Self {
            candidate: find(&schema.candidate_column)?,
            timestamp: find(&schema.timestamp_column)?,
            sentiment: find(&schema.sentiment_column)?,
            body: find(&schema.body_column)?,
        })
    }
}

/// The loaded, immutable article table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    articles: Vec<Article>,
    candidates: Vec<String>,
    months: Vec<MonthKey>,
}

impl Dataset {
    /// Load the table from a CSV file.
    pub fn load(path: &Path, schema: &Schema) -> Result<Self, DataLoadError> {
        if !path.exists() {
            return Err(DataLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_reader(file, schema)?;
        info!(
            "Loaded {} articles for {} candidates from {}",
            dataset.len(),
            dataset.candidates.len(),
            path.display()
        );

        Ok(dataset)
    }

    /// Load the table from any CSV source.
    pub fn from_reader<R: Read>(reader: R, schema: &Schema) -> Result<Self, DataLoadError> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(schema.delimiter)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndex::resolve(&headers, schema)?;
        debug!("Resolved columns in header: {:?}", headers);

        let mut articles = Vec::new();

        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            articles.push(parse_record(&record, &columns, schema, line)?);
        }

        Ok(Self::from_articles(articles))
    }

    /// Build a dataset from already-parsed articles.
    pub fn from_articles(articles: Vec<Article>) -> Self {
        let candidates: BTreeSet<&str> = articles.iter().map(|a| a.candidate.as_str()).collect();
        let months: BTreeSet<MonthKey> = articles.iter().map(|a| a.month).collect();

        Self {
            candidates: candidates.into_iter().map(String::from).collect(),
            months: months.into_iter().collect(),
            articles,
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Distinct candidate identifiers, sorted.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Distinct month buckets present in the table, chronological.
    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    /// The range from the earliest to the latest observed month.
    pub fn full_range(&self) -> Option<MonthRange> {
        match (self.months.first(), self.months.last()) {
            (Some(first), Some(last)) => Some(MonthRange::new(*first, *last)),
            _ => None,
        }
    }

    pub fn has_candidate(&self, candidate: &str) -> bool {
        self.candidates
            .binary_search_by(|c| c.as_str().cmp(candidate))
            .is_ok()
    }

    /// Every article about one candidate, regardless of month.
    pub fn articles_for<'a>(&'a self, candidate: &'a str) -> impl Iterator<Item = &'a Article> + 'a {
        self.articles.iter().filter(move |a| a.candidate == candidate)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

fn parse_record(
    record: &StringRecord,
    columns: &ColumnIndex,
    schema: &Schema,
    line: u64,
) -> Result<Article, DataLoadError> {
    let cell = |idx: usize| record.get(idx).unwrap_or("");

    // Ids and labels are kept verbatim; whitespace only decides emptiness.
    let candidate = cell(columns.candidate);
    if candidate.trim().is_empty() {
        return Err(DataLoadError::MissingCandidate { line });
    }

    let raw_timestamp = cell(columns.timestamp);
    let published =
        parse_timestamp(raw_timestamp).ok_or_else(|| DataLoadError::InvalidTimestamp {
            line,
            value: raw_timestamp.to_string(),
        })?;

    let raw_sentiment = cell(columns.sentiment);
    let sentiment = if raw_sentiment.trim().is_empty() {
        None
    } else {
        Some(Sentiment::classify(
            raw_sentiment,
            &schema.positive_label,
            &schema.negative_label,
        ))
    };

    let raw_body = cell(columns.body);
    let body = if raw_body.trim().is_empty() {
        None
    } else {
        Some(raw_body.to_string())
    };

    Ok(Article::new(candidate.to_string(), published, sentiment, body))
}

/// Parse a publish timestamp into a naive instant.
///
/// An offset, if present, is dropped and the wall-clock reading kept.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    let offset_formats = [
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
    ];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    let naive_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in naive_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}
