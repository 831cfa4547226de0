//! Data models for the listening report.
//!
//! This module contains the article record, the derived monthly
//! aggregates, and the report structures handed to the renderers.

use crate::dataset::{MonthKey, MonthRange};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Tone class of a sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    /// Neutral or any label outside the recognized vocabulary.
    Other,
}

/// A sentiment label as it appears in the dataset, with its tone class.
///
/// The raw label is kept verbatim so unrecognized values are grouped under
/// their own name instead of being folded into another class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentiment {
    label: String,
    tone: Tone,
}

impl Sentiment {
    /// Classify a raw label against the configured positive/negative spellings.
    pub fn classify(raw: &str, positive_label: &str, negative_label: &str) -> Self {
        let tone = if raw == positive_label {
            Tone::Positive
        } else if raw == negative_label {
            Tone::Negative
        } else {
            Tone::Other
        };

        Self {
            label: raw.to_string(),
            tone,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// One row of the article table.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    /// Candidate the article is about (opaque, case-sensitive).
    pub candidate: String,
    /// Publish time, timezone-naive.
    pub published: NaiveDateTime,
    /// Month bucket derived from `published`.
    pub month: MonthKey,
    /// Sentiment label; `None` when the cell is empty.
    pub sentiment: Option<Sentiment>,
    /// Cleaned article body; `None` when the cell is empty.
    pub body: Option<String>,
}

impl Article {
    pub fn new(
        candidate: String,
        published: NaiveDateTime,
        sentiment: Option<Sentiment>,
        body: Option<String>,
    ) -> Self {
        Self {
            candidate,
            month: MonthKey::of(&published),
            published,
            sentiment,
            body,
        }
    }

    pub fn tone(&self) -> Option<Tone> {
        self.sentiment.as_ref().map(Sentiment::tone)
    }

    pub fn is_positive(&self) -> bool {
        self.tone() == Some(Tone::Positive)
    }

    pub fn is_negative(&self) -> bool {
        self.tone() == Some(Tone::Negative)
    }
}

/// Number of articles in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: MonthKey,
    pub count: usize,
}

/// Percentage share of each sentiment label within one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySentimentShare {
    pub month: MonthKey,
    /// Number of labeled articles the shares are computed over.
    pub labeled: usize,
    /// Label → percentage (0-100); sums to 100.
    pub shares: BTreeMap<String, f64>,
}

/// A single percentage value for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyPercentage {
    pub month: MonthKey,
    pub percent: f64,
}

/// Headline counts for a filtered set of articles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CandidateMetrics {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
}

/// Which monthly series a comparison is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMetric {
    /// Monthly mention counts.
    Mentions,
    /// Monthly positive-share percentage.
    PositiveShare,
}

impl fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonMetric::Mentions => write!(f, "Mentions"),
            ComparisonMetric::PositiveShare => write!(f, "% Positive"),
        }
    }
}

/// One month of a two-candidate comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonPoint {
    pub month: MonthKey,
    pub left: f64,
    pub right: f64,
}

/// Two monthly series outer-joined on month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    pub metric: ComparisonMetric,
    pub left: String,
    pub right: String,
    pub points: Vec<ComparisonPoint>,
}

impl ComparisonSeries {
    /// The same series with the two candidates swapped.
    #[allow(dead_code)] // Utility for symmetric comparisons
    pub fn swapped(&self) -> Self {
        Self {
            metric: self.metric,
            left: self.right.clone(),
            right: self.left.clone(),
            points: self
                .points
                .iter()
                .map(|p| ComparisonPoint {
                    month: p.month,
                    left: p.right,
                    right: p.left,
                })
                .collect(),
        }
    }
}

/// A token and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

impl NoticeLevel {
    pub fn emoji(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Warning => "⚠️",
        }
    }
}

/// A message shown alongside the report instead of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Metadata about the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the article table.
    pub data_path: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of articles in the table.
    pub total_articles: usize,
    /// Number of distinct candidates.
    pub candidates: usize,
    /// Month range applied to the time series.
    pub range: MonthRange,
}

/// Single-candidate analysis.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub candidate: String,
    pub metrics: CandidateMetrics,
    pub mentions: Vec<MonthlyCount>,
    pub sentiment: Vec<MonthlySentimentShare>,
}

/// Two-candidate comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonView {
    pub mentions: ComparisonSeries,
    pub positive_share: ComparisonSeries,
}

/// Word frequencies for one candidate.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeView {
    pub candidate: String,
    /// Number of articles with a body.
    pub articles_with_text: usize,
    /// Most frequent words, already thresholded and ranked.
    pub words: Vec<WordCount>,
}

/// The complete report.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<CandidateView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<NarrativeView>,
    pub notices: Vec<Notice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_sentiment_classify() {
        let pos = Sentiment::classify("positivo", "positivo", "negativo");
        assert_eq!(pos.tone(), Tone::Positive);

        let neg = Sentiment::classify("negativo", "positivo", "negativo");
        assert_eq!(neg.tone(), Tone::Negative);

        let other = Sentiment::classify("neutro", "positivo", "negativo");
        assert_eq!(other.tone(), Tone::Other);
        assert_eq!(other.label(), "neutro");
    }

    #[test]
    fn test_sentiment_is_case_sensitive() {
        let s = Sentiment::classify("Positivo", "positivo", "negativo");
        assert_eq!(s.tone(), Tone::Other);
    }

    #[test]
    fn test_article_derives_month() {
        let article = Article::new("X".to_string(), at("2024-03-15 10:00:00"), None, None);
        assert_eq!(article.month, MonthKey::new(2024, 3).unwrap());
        assert!(!article.is_positive());
        assert!(!article.is_negative());
    }

    #[test]
    fn test_comparison_swapped() {
        let series = ComparisonSeries {
            metric: ComparisonMetric::Mentions,
            left: "A".to_string(),
            right: "B".to_string(),
            points: vec![ComparisonPoint {
                month: MonthKey::new(2024, 1).unwrap(),
                left: 3.0,
                right: 0.0,
            }],
        };

        let swapped = series.swapped();
        assert_eq!(swapped.left, "B");
        assert_eq!(swapped.right, "A");
        assert_eq!(swapped.points[0].left, 0.0);
        assert_eq!(swapped.points[0].right, 3.0);
        assert_eq!(swapped.swapped(), series);
    }
}
