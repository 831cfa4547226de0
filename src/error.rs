//! Error types for dataset loading and candidate comparison.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn the article table into a [`crate::dataset::Dataset`].
///
/// Every variant is fatal: no aggregation can run without a loaded table.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column '{column}'")]
    MissingColumn { column: String },
    #[error("line {line}: cannot parse publish timestamp '{value}'")]
    InvalidTimestamp { line: u64, value: String },
    #[error("line {line}: empty candidate identifier")]
    MissingCandidate { line: u64 },
}

/// Rejected cross-candidate comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    #[error("cannot compare candidate '{0}' against itself; select two different candidates")]
    SameCandidate(String),
}
