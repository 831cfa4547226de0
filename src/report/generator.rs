//! Markdown report generation.
//!
//! This module renders a [`DashboardReport`] as Markdown or JSON. Every
//! value arrives already aggregated; rendering only formats it.

use crate::models::{
    CandidateMetrics, CandidateView, ComparisonSeries, ComparisonView, DashboardReport,
    MonthlyCount, MonthlySentimentShare, NarrativeView, Notice, ReportMetadata,
};
use anyhow::Result;
use std::collections::BTreeSet;

const NO_DATA: &str = "_No data for the selected candidate and range._\n\n";

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &DashboardReport) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Escucha Social - Candidate Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_notices_section(&report.notices));

    if let Some(ref view) = report.candidate {
        output.push_str(&generate_candidate_section(view));
    }

    if let Some(ref view) = report.comparison {
        output.push_str(&generate_comparison_section(view));
    }

    if let Some(ref view) = report.narrative {
        output.push_str(&generate_narrative_section(view));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.data_path));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Articles:** {}\n", metadata.total_articles));
    section.push_str(&format!("- **Candidates:** {}\n", metadata.candidates));
    section.push_str(&format!(
        "- **Months:** {} to {}\n",
        metadata.range.start.label(),
        metadata.range.end.label()
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &DashboardReport) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");

    if !report.notices.is_empty() {
        toc.push_str("- [Notices](#notices)\n");
    }
    if report.candidate.is_some() {
        toc.push_str("- [Candidate Analysis](#candidate-analysis)\n");
    }
    if report.comparison.is_some() {
        toc.push_str("- [Comparison](#comparison)\n");
    }
    if report.narrative.is_some() {
        toc.push_str("- [Narrative](#narrative)\n");
    }

    toc.push('\n');

    toc
}

fn generate_notices_section(notices: &[Notice]) -> String {
    if notices.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Notices\n\n");

    for notice in notices {
        section.push_str(&format!("> {} {}\n>\n", notice.level.emoji(), notice.message));
    }
    section.push('\n');

    section
}

/// Generate the single-candidate section.
fn generate_candidate_section(view: &CandidateView) -> String {
    let mut section = String::new();

    section.push_str("## Candidate Analysis\n\n");
    section.push_str(&format!("**Candidate:** {}\n\n", view.candidate));

    section.push_str(&generate_metrics_table(&view.metrics));

    section.push_str("### Monthly Mentions\n\n");
    section.push_str(&generate_mentions_table(&view.mentions));

    section.push_str("### Sentiment Over Time (%)\n\n");
    section.push_str(&generate_sentiment_table(&view.sentiment));

    section
}

fn generate_metrics_table(metrics: &CandidateMetrics) -> String {
    let mut table = String::new();

    table.push_str("| Total Mentions | Positive | Negative |\n");
    table.push_str("|:---:|:---:|:---:|\n");
    table.push_str(&format!(
        "| **{}** | {} | {} |\n\n",
        metrics.total, metrics.positive, metrics.negative
    ));

    table
}

fn generate_mentions_table(mentions: &[MonthlyCount]) -> String {
    if mentions.is_empty() {
        return NO_DATA.to_string();
    }

    let mut table = String::new();
    table.push_str("| Month | Mentions |\n");
    table.push_str("|:---|:---:|\n");

    for row in mentions {
        table.push_str(&format!("| {} | {} |\n", row.month.label(), row.count));
    }
    table.push('\n');

    table
}

/// One column per label seen in any month; a label missing from a month
/// is shown as 0%.
fn generate_sentiment_table(series: &[MonthlySentimentShare]) -> String {
    if series.is_empty() {
        return NO_DATA.to_string();
    }

    let labels: BTreeSet<&str> = series
        .iter()
        .flat_map(|m| m.shares.keys().map(String::as_str))
        .collect();

    let mut table = String::new();
    table.push_str("| Month |");
    for label in &labels {
        table.push_str(&format!(" {} |", label));
    }
    table.push('\n');

    table.push_str("|:---|");
    for _ in &labels {
        table.push_str(":---:|");
    }
    table.push('\n');

    for month in series {
        table.push_str(&format!("| {} |", month.month.label()));
        for label in &labels {
            let share = month.shares.get(*label).copied().unwrap_or(0.0);
            table.push_str(&format!(" {:.1}% |", share));
        }
        table.push('\n');
    }
    table.push('\n');

    table
}

/// Generate the two-candidate section.
fn generate_comparison_section(view: &ComparisonView) -> String {
    let mut section = String::new();

    section.push_str("## Comparison\n\n");
    section.push_str(&format!(
        "**{}** vs **{}**\n\n",
        view.mentions.left, view.mentions.right
    ));

    section.push_str("### Monthly Mentions\n\n");
    section.push_str(&generate_comparison_table(&view.mentions, false));

    section.push_str("### % Positive News\n\n");
    section.push_str(&generate_comparison_table(&view.positive_share, true));

    section
}

fn generate_comparison_table(series: &ComparisonSeries, percent: bool) -> String {
    if series.points.is_empty() {
        return NO_DATA.to_string();
    }

    let mut table = String::new();
    table.push_str(&format!(
        "| Month | {} {} | {} {} |\n",
        series.metric, series.left, series.metric, series.right
    ));
    table.push_str("|:---|:---:|:---:|\n");

    for point in &series.points {
        let (left, right) = if percent {
            (
                format!("{:.1}%", point.left),
                format!("{:.1}%", point.right),
            )
        } else {
            (format!("{}", point.left), format!("{}", point.right))
        };
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            point.month.label(),
            left,
            right
        ));
    }
    table.push('\n');

    table
}

/// Generate the word frequency section.
fn generate_narrative_section(view: &NarrativeView) -> String {
    let mut section = String::new();

    section.push_str("## Narrative\n\n");
    section.push_str(&format!(
        "**Candidate:** {} ({} articles with text)\n\n",
        view.candidate, view.articles_with_text
    ));

    if view.articles_with_text == 0 {
        section.push_str("_No text available for this candidate._\n\n");
        return section;
    }
    if view.words.is_empty() {
        section.push_str("_No frequent words for this candidate._\n\n");
        return section;
    }

    section.push_str("| # | Word | Count |\n");
    section.push_str("|:---:|:---|:---:|\n");
    for (i, word) in view.words.iter().enumerate() {
        section.push_str(&format!("| {} | {} | {} |\n", i + 1, word.word, word.count));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by Escucha*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{MonthKey, MonthRange};
    use crate::models::{ComparisonMetric, ComparisonPoint, WordCount};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn create_test_report() -> DashboardReport {
        let metadata = ReportMetadata {
            data_path: "dataout/candidates_news.csv".to_string(),
            generated_at: Utc::now(),
            total_articles: 10,
            candidates: 2,
            range: MonthRange::new(month("2024-03"), month("2024-04")),
        };

        let shares: BTreeMap<String, f64> = [
            ("negativo".to_string(), 100.0 / 3.0),
            ("positivo".to_string(), 200.0 / 3.0),
        ]
        .into_iter()
        .collect();

        DashboardReport {
            metadata,
            candidate: Some(CandidateView {
                candidate: "X".to_string(),
                metrics: CandidateMetrics {
                    total: 3,
                    positive: 2,
                    negative: 1,
                },
                mentions: vec![MonthlyCount {
                    month: month("2024-03"),
                    count: 3,
                }],
                sentiment: vec![MonthlySentimentShare {
                    month: month("2024-03"),
                    labeled: 3,
                    shares,
                }],
            }),
            comparison: Some(ComparisonView {
                mentions: ComparisonSeries {
                    metric: ComparisonMetric::Mentions,
                    left: "X".to_string(),
                    right: "Y".to_string(),
                    points: vec![ComparisonPoint {
                        month: month("2024-03"),
                        left: 3.0,
                        right: 0.0,
                    }],
                },
                positive_share: ComparisonSeries {
                    metric: ComparisonMetric::PositiveShare,
                    left: "X".to_string(),
                    right: "Y".to_string(),
                    points: vec![ComparisonPoint {
                        month: month("2024-03"),
                        left: 200.0 / 3.0,
                        right: 0.0,
                    }],
                },
            }),
            narrative: Some(NarrativeView {
                candidate: "X".to_string(),
                articles_with_text: 3,
                words: vec![WordCount {
                    word: "reforma".to_string(),
                    count: 12,
                }],
            }),
            notices: Vec::new(),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Escucha Social - Candidate Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Candidate Analysis"));
        assert!(markdown.contains("## Comparison"));
        assert!(markdown.contains("## Narrative"));
        assert!(markdown.contains("| Mar 2024 | 3 |"));
        assert!(markdown.contains("| Mar 2024 | 33.3% | 66.7% |"));
        assert!(markdown.contains("| Mar 2024 | 66.7% | 0.0% |"));
        assert!(markdown.contains("| 1 | reforma | 12 |"));
        assert!(!markdown.contains("## Notices"));
    }

    #[test]
    fn test_generate_metadata_section() {
        let report = create_test_report();
        let section = generate_metadata_section(&report.metadata);

        assert!(section.contains("dataout/candidates_news.csv"));
        assert!(section.contains("**Articles:** 10"));
        assert!(section.contains("Mar 2024 to Apr 2024"));
    }

    #[test]
    fn test_empty_series_render_no_data() {
        assert_eq!(generate_mentions_table(&[]), NO_DATA);
        assert_eq!(generate_sentiment_table(&[]), NO_DATA);

        let view = NarrativeView {
            candidate: "Y".to_string(),
            articles_with_text: 0,
            words: Vec::new(),
        };
        let section = generate_narrative_section(&view);
        assert!(section.contains("No text available"));
        assert!(!section.contains("| # |"));
    }

    #[test]
    fn test_sentiment_table_fills_missing_labels() {
        let series = vec![
            MonthlySentimentShare {
                month: month("2024-01"),
                labeled: 1,
                shares: [("positivo".to_string(), 100.0)].into_iter().collect(),
            },
            MonthlySentimentShare {
                month: month("2024-02"),
                labeled: 1,
                shares: [("neutro".to_string(), 100.0)].into_iter().collect(),
            },
        ];

        let table = generate_sentiment_table(&series);
        assert!(table.contains("| Month | neutro | positivo |"));
        assert!(table.contains("| Jan 2024 | 0.0% | 100.0% |"));
        assert!(table.contains("| Feb 2024 | 100.0% | 0.0% |"));
    }

    #[test]
    fn test_notices_rendered() {
        let mut report = create_test_report();
        report.comparison = None;
        report
            .notices
            .push(Notice::warning("Select two different candidates."));

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("## Notices"));
        assert!(markdown.contains("Select two different candidates."));
        assert!(!markdown.contains("## Comparison"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"2024-03\""));
        assert!(json.contains("\"positive_share\""));
        assert!(json.contains("\"reforma\""));
    }
}
