//! Aggregation pipeline.
//!
//! Turns the flat article table into monthly series, comparisons and
//! word frequencies.

pub mod aggregator;
pub mod compare;
pub mod words;

pub use aggregator::*;
pub use compare::*;
pub use words::*;
