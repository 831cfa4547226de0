//! Monthly aggregation of filtered articles.
//!
//! Every function here is pure: it borrows the loaded table (or a filtered
//! slice of it) and returns a fresh series ordered by month.

use crate::dataset::{Dataset, MonthKey, MonthRange};
use crate::models::{
    Article, CandidateMetrics, MonthlyCount, MonthlyPercentage, MonthlySentimentShare,
};
use std::collections::BTreeMap;

/// Per-month tallies used to derive every monthly series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthBucket {
    /// Every article in the month, labeled or not.
    pub total: usize,
    /// Articles classified positive.
    pub positive: usize,
    /// Label → count, for articles that carry a label.
    pub by_label: BTreeMap<String, usize>,
}

impl MonthBucket {
    fn add(&mut self, article: &Article) {
        self.total += 1;
        if article.is_positive() {
            self.positive += 1;
        }
        if let Some(ref sentiment) = article.sentiment {
            *self
                .by_label
                .entry(sentiment.label().to_string())
                .or_default() += 1;
        }
    }

    /// Number of articles that carry a label.
    pub fn labeled(&self) -> usize {
        self.by_label.values().sum()
    }
}

/// Articles about `candidate` published within `range`.
///
/// The range is inclusive on both ends; the end bound is the last instant
/// of the end month.
pub fn filter_articles<'a>(
    dataset: &'a Dataset,
    candidate: &str,
    range: MonthRange,
) -> Vec<&'a Article> {
    if range.is_empty() {
        return Vec::new();
    }

    dataset
        .articles()
        .iter()
        .filter(|a| a.candidate == candidate && range.contains(&a.published))
        .collect()
}

/// Group articles into month buckets. Only observed months appear.
pub fn group_by_month(articles: &[&Article]) -> BTreeMap<MonthKey, MonthBucket> {
    let mut grouped: BTreeMap<MonthKey, MonthBucket> = BTreeMap::new();

    for article in articles {
        grouped.entry(article.month).or_default().add(article);
    }

    grouped
}

/// Number of articles per observed month.
pub fn mention_series(articles: &[&Article]) -> Vec<MonthlyCount> {
    group_by_month(articles)
        .into_iter()
        .map(|(month, bucket)| MonthlyCount {
            month,
            count: bucket.total,
        })
        .collect()
}

/// Share of each sentiment label per month, over the labeled articles of
/// that month. Months without a labeled article are left out.
pub fn sentiment_share_series(articles: &[&Article]) -> Vec<MonthlySentimentShare> {
    group_by_month(articles)
        .into_iter()
        .filter_map(|(month, bucket)| {
            let labeled = bucket.labeled();
            if labeled == 0 {
                return None;
            }

            let shares = bucket
                .by_label
                .into_iter()
                .map(|(label, count)| (label, count as f64 / labeled as f64 * 100.0))
                .collect();

            Some(MonthlySentimentShare {
                month,
                labeled,
                shares,
            })
        })
        .collect()
}

/// Percentage of positive articles per month.
///
/// The denominator is every article in the month, labeled or not. Months
/// with no articles never appear.
pub fn positive_share_series(articles: &[&Article]) -> Vec<MonthlyPercentage> {
    group_by_month(articles)
        .into_iter()
        .filter(|(_, bucket)| bucket.total > 0)
        .map(|(month, bucket)| MonthlyPercentage {
            month,
            percent: bucket.positive as f64 / bucket.total as f64 * 100.0,
        })
        .collect()
}

/// Headline counts: all mentions, positive and negative.
pub fn candidate_metrics(articles: &[&Article]) -> CandidateMetrics {
    CandidateMetrics {
        total: articles.len(),
        positive: articles.iter().filter(|a| a.is_positive()).count(),
        negative: articles.iter().filter(|a| a.is_negative()).count(),
    }
}
