//! Report assembly.
//!
//! Resolves the user's selection against the loaded table, runs the
//! aggregation pipeline for each requested view and collects the results
//! (and any warnings) into a [`DashboardReport`].

use crate::analysis::{
    candidate_metrics, candidate_word_frequencies, compare_candidates, filter_articles,
    mention_series, sentiment_share_series, MIN_TOKEN_COUNT,
};
use crate::cli::{Args, View};
use crate::config::ReportConfig;
use crate::dataset::{Dataset, MonthKey, MonthRange};
use crate::models::{
    CandidateView, ComparisonMetric, ComparisonView, DashboardReport, NarrativeView, Notice,
    ReportMetadata,
};
use anyhow::{anyhow, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

/// What the user asked for; unset fields fall back to dataset defaults.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub candidate: Option<String>,
    pub versus: Option<String>,
    pub narrative: Option<String>,
    pub from: Option<MonthKey>,
    pub to: Option<MonthKey>,
}

impl From<&Args> for Selection {
    fn from(args: &Args) -> Self {
        Self {
            candidate: args.candidate.clone(),
            versus: args.versus.clone(),
            narrative: args.narrative.clone(),
            from: args.from,
            to: args.to,
        }
    }
}

/// A selection with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    pub candidate: String,
    pub versus: String,
    pub narrative: String,
    pub range: MonthRange,
}

impl Selection {
    /// Fill in defaults: the first candidate of the table for every
    /// selector, and the full observed month range.
    pub fn resolve(&self, dataset: &Dataset) -> Result<ResolvedSelection> {
        let first = dataset
            .candidates()
            .first()
            .ok_or_else(|| anyhow!("Dataset contains no articles"))?;
        let full = dataset
            .full_range()
            .ok_or_else(|| anyhow!("Dataset contains no articles"))?;

        let candidate = self.candidate.clone().unwrap_or_else(|| first.clone());
        let versus = self.versus.clone().unwrap_or_else(|| first.clone());
        let narrative = self.narrative.clone().unwrap_or_else(|| candidate.clone());

        let range = MonthRange::new(
            self.from.unwrap_or(full.start),
            self.to.unwrap_or(full.end),
        );

        Ok(ResolvedSelection {
            candidate,
            versus,
            narrative,
            range,
        })
    }
}

/// Run the pipeline for every requested view.
pub fn build_report(
    dataset: &Dataset,
    selection: &ResolvedSelection,
    view: View,
    report_config: &ReportConfig,
    data_path: &str,
) -> DashboardReport {
    let mut notices = Vec::new();
    let range = selection.range;

    if range.is_empty() {
        warn!("Empty month range: {}", range);
        notices.push(Notice::warning(format!(
            "Start month {} is after end month {}; the range selects nothing.",
            range.start, range.end
        )));
    }

    for name in unknown_candidates(dataset, selection, view) {
        warn!("Candidate not found in dataset: {}", name);
        notices.push(Notice::warning(format!(
            "Candidate '{}' does not appear in the dataset.",
            name
        )));
    }

    let candidate = if view.includes_candidate() {
        Some(candidate_view(dataset, &selection.candidate, range, &mut notices))
    } else {
        None
    };

    let comparison = if view.includes_comparison() {
        comparison_view(dataset, &selection.candidate, &selection.versus, range, &mut notices)
    } else {
        None
    };

    let narrative = if view.includes_narrative() {
        Some(narrative_view(dataset, &selection.narrative, report_config, &mut notices))
    } else {
        None
    };

    DashboardReport {
        metadata: ReportMetadata {
            data_path: data_path.to_string(),
            generated_at: Utc::now(),
            total_articles: dataset.len(),
            candidates: dataset.candidates().len(),
            range,
        },
        candidate,
        comparison,
        narrative,
        notices,
    }
}

/// Selected candidates (for the requested views) missing from the table,
/// each reported once.
fn unknown_candidates<'a>(
    dataset: &Dataset,
    selection: &'a ResolvedSelection,
    view: View,
) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    if view.includes_candidate() || view.includes_comparison() {
        names.push(&selection.candidate);
    }
    if view.includes_comparison() {
        names.push(&selection.versus);
    }
    if view.includes_narrative() {
        names.push(&selection.narrative);
    }

    let mut unknown: Vec<&str> = Vec::new();
    for name in names {
        if !dataset.has_candidate(name) && !unknown.contains(&name) {
            unknown.push(name);
        }
    }
    unknown
}

fn candidate_view(
    dataset: &Dataset,
    candidate: &str,
    range: MonthRange,
    notices: &mut Vec<Notice>,
) -> CandidateView {
    let filtered = filter_articles(dataset, candidate, range);
    info!("{} articles about {} in {}", filtered.len(), candidate, range);

    if filtered.is_empty() {
        notices.push(Notice::info(format!(
            "No mentions of '{}' between {} and {}.",
            candidate,
            range.start.label(),
            range.end.label()
        )));
    }

    CandidateView {
        candidate: candidate.to_string(),
        metrics: candidate_metrics(&filtered),
        mentions: mention_series(&filtered),
        sentiment: sentiment_share_series(&filtered),
    }
}

fn comparison_view(
    dataset: &Dataset,
    left: &str,
    right: &str,
    range: MonthRange,
    notices: &mut Vec<Notice>,
) -> Option<ComparisonView> {
    let compare = |metric| compare_candidates(dataset, left, right, range, metric);

    match (
        compare(ComparisonMetric::Mentions),
        compare(ComparisonMetric::PositiveShare),
    ) {
        (Ok(mentions), Ok(positive_share)) => {
            debug!("Comparison covers {} months", mentions.points.len());
            Some(ComparisonView {
                mentions,
                positive_share,
            })
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!("Comparison skipped: {}", e);
            notices.push(Notice::warning(e.to_string()));
            None
        }
    }
}

fn narrative_view(
    dataset: &Dataset,
    candidate: &str,
    report_config: &ReportConfig,
    notices: &mut Vec<Notice>,
) -> NarrativeView {
    let (articles_with_text, frequencies) = candidate_word_frequencies(dataset, candidate);
    debug!(
        "{} distinct frequent words for {} across {} articles",
        frequencies.len(),
        candidate,
        articles_with_text
    );

    let words = frequencies.ranked(report_config.max_words, &report_config.stopwords);

    if articles_with_text == 0 {
        notices.push(Notice::info(format!(
            "No text available for '{}'.",
            candidate
        )));
    } else if words.is_empty() {
        notices.push(Notice::info(format!(
            "No word occurs more than {} times in the articles about '{}'.",
            MIN_TOKEN_COUNT, candidate
        )));
    }

    NarrativeView {
        candidate: candidate.to_string(),
        articles_with_text,
        words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, CandidateMetrics, NoticeLevel, Sentiment};
    use chrono::NaiveDateTime;

    fn article(candidate: &str, at: &str, label: &str, body: &str) -> Article {
        Article::new(
            candidate.to_string(),
            NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M:%S").unwrap(),
            Some(Sentiment::classify(label, "positivo", "negativo")),
            Some(body.to_string()),
        )
    }

    fn dataset() -> Dataset {
        let body = "salud salud salud educacion";
        Dataset::from_articles(vec![
            article("B", "2024-03-02 09:00:00", "positivo", body),
            article("B", "2024-03-15 12:00:00", "positivo", body),
            article("B", "2024-03-31 23:00:00", "negativo", body),
            article("A", "2024-01-10 10:00:00", "neutro", "hola"),
        ])
    }

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let resolved = Selection::default().resolve(&dataset()).unwrap();
        assert_eq!(resolved.candidate, "A");
        assert_eq!(resolved.versus, "A");
        assert_eq!(resolved.narrative, "A");
        assert_eq!(resolved.range, MonthRange::new(month("2024-01"), month("2024-03")));
    }

    #[test]
    fn test_resolve_explicit() {
        let selection = Selection {
            candidate: Some("B".to_string()),
            versus: Some("A".to_string()),
            narrative: None,
            from: Some(month("2024-02")),
            to: None,
        };
        let resolved = selection.resolve(&dataset()).unwrap();
        assert_eq!(resolved.candidate, "B");
        assert_eq!(resolved.narrative, "B");
        assert_eq!(resolved.range.start, month("2024-02"));
        assert_eq!(resolved.range.end, month("2024-03"));
    }

    #[test]
    fn test_resolve_empty_dataset_fails() {
        assert!(Selection::default().resolve(&Dataset::default()).is_err());
    }

    #[test]
    fn test_default_selection_rejects_comparison() {
        let data = dataset();
        let resolved = Selection::default().resolve(&data).unwrap();
        let report = build_report(&data, &resolved, View::All, &ReportConfig::default(), "x.csv");

        assert!(report.comparison.is_none());
        assert!(report
            .notices
            .iter()
            .any(|n| n.level == NoticeLevel::Warning && n.message.contains("'A'")));
    }

    #[test]
    fn test_full_report() {
        let data = dataset();
        let resolved = Selection {
            candidate: Some("B".to_string()),
            versus: Some("A".to_string()),
            ..Default::default()
        }
        .resolve(&data)
        .unwrap();

        let mut config = ReportConfig::default();
        config.stopwords = vec!["educacion".to_string()];
        let report = build_report(&data, &resolved, View::All, &config, "x.csv");

        let candidate = report.candidate.unwrap();
        assert_eq!(candidate.metrics.total, 3);
        assert_eq!(candidate.metrics.positive, 2);
        assert_eq!(candidate.mentions.len(), 1);

        let comparison = report.comparison.unwrap();
        assert_eq!(comparison.mentions.points.len(), 2);
        assert_eq!(comparison.mentions.points[0].left, 0.0);
        assert_eq!(comparison.mentions.points[0].right, 1.0);

        // "salud" occurs 9 times across the three bodies, "educacion" 3.
        let narrative = report.narrative.unwrap();
        assert_eq!(narrative.articles_with_text, 3);
        assert_eq!(narrative.words.len(), 1);
        assert_eq!(narrative.words[0].word, "salud");
        assert_eq!(narrative.words[0].count, 9);

        assert!(report.notices.is_empty());
    }

    #[test]
    fn test_unknown_candidate_yields_empty_views() {
        let data = dataset();
        let resolved = Selection {
            candidate: Some("Y".to_string()),
            versus: Some("B".to_string()),
            ..Default::default()
        }
        .resolve(&data)
        .unwrap();

        let report = build_report(&data, &resolved, View::All, &ReportConfig::default(), "x.csv");

        let candidate = report.candidate.unwrap();
        assert_eq!(candidate.metrics, CandidateMetrics::default());
        assert!(candidate.mentions.is_empty());
        assert!(candidate.sentiment.is_empty());
        assert!(report.narrative.unwrap().words.is_empty());

        let warnings = report
            .notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Warning)
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_single_view() {
        let data = dataset();
        let resolved = Selection {
            candidate: Some("B".to_string()),
            ..Default::default()
        }
        .resolve(&data)
        .unwrap();

        let report = build_report(
            &data,
            &resolved,
            View::Candidate,
            &ReportConfig::default(),
            "x.csv",
        );
        assert!(report.candidate.is_some());
        assert!(report.comparison.is_none());
        assert!(report.narrative.is_none());
        assert!(report.notices.is_empty());
    }

    #[test]
    fn test_reversed_range_warns() {
        let data = dataset();
        let resolved = Selection {
            candidate: Some("B".to_string()),
            from: Some(month("2024-03")),
            to: Some(month("2024-01")),
            ..Default::default()
        }
        .resolve(&data)
        .unwrap();

        let report = build_report(
            &data,
            &resolved,
            View::Candidate,
            &ReportConfig::default(),
            "x.csv",
        );
        assert!(report.candidate.unwrap().mentions.is_empty());
        assert!(report
            .notices
            .iter()
            .any(|n| n.level == NoticeLevel::Warning && n.message.contains("after end month")));
    }
}
