//! Two-candidate comparison series.

use crate::analysis::aggregator::{filter_articles, mention_series, positive_share_series};
use crate::dataset::{Dataset, MonthKey, MonthRange};
use crate::error::ComparisonError;
use crate::models::{ComparisonMetric, ComparisonPoint, ComparisonSeries};
use std::collections::BTreeMap;
use tracing::debug;

/// Compute one metric for two candidates over the same range and
/// outer-join the results on month.
///
/// A month observed for only one candidate is filled with `0` for the
/// other. Comparing a candidate against itself is rejected.
pub fn compare_candidates(
    dataset: &Dataset,
    left: &str,
    right: &str,
    range: MonthRange,
    metric: ComparisonMetric,
) -> Result<ComparisonSeries, ComparisonError> {
    if left == right {
        return Err(ComparisonError::SameCandidate(left.to_string()));
    }

    let left_series = monthly_values(dataset, left, range, metric);
    let right_series = monthly_values(dataset, right, range, metric);
    debug!(
        "Comparing {} ({} months) with {} ({} months) by {:?}",
        left,
        left_series.len(),
        right,
        right_series.len(),
        metric
    );

    Ok(ComparisonSeries {
        metric,
        left: left.to_string(),
        right: right.to_string(),
        points: outer_join(&left_series, &right_series),
    })
}

/// The per-month values of one candidate for a metric.
fn monthly_values(
    dataset: &Dataset,
    candidate: &str,
    range: MonthRange,
    metric: ComparisonMetric,
) -> BTreeMap<MonthKey, f64> {
    let filtered = filter_articles(dataset, candidate, range);

    match metric {
        ComparisonMetric::Mentions => mention_series(&filtered)
            .into_iter()
            .map(|m| (m.month, m.count as f64))
            .collect(),
        ComparisonMetric::PositiveShare => positive_share_series(&filtered)
            .into_iter()
            .map(|p| (p.month, p.percent))
            .collect(),
    }
}

/// Join two monthly series on month, filling gaps with zero.
pub fn outer_join(
    left: &BTreeMap<MonthKey, f64>,
    right: &BTreeMap<MonthKey, f64>,
) -> Vec<ComparisonPoint> {
    let mut months: Vec<MonthKey> = left.keys().chain(right.keys()).copied().collect();
    months.sort();
    months.dedup();

    months
        .into_iter()
        .map(|month| ComparisonPoint {
            month,
            left: left.get(&month).copied().unwrap_or(0.0),
            right: right.get(&month).copied().unwrap_or(0.0),
        })
        .collect()
}
