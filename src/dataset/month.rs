//! Calendar month buckets and inclusive month ranges.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar year + month, ordered chronologically.
///
/// Internally anchored to the first day of the month, so the derived
/// ordering is the calendar ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// Build a month key, returning `None` for an out-of-range month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month bucket an instant falls into.
    pub fn of(instant: &NaiveDateTime) -> Self {
        let date = instant.date();
        Self(date.with_day(1).expect("day 1 exists in every month"))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Midnight on the first day of the month.
    pub fn first_instant(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// The last representable instant of the month (one nanosecond before
    /// the next month starts).
    pub fn last_instant(&self) -> NaiveDateTime {
        match self.0.checked_add_months(Months::new(1)) {
            Some(next) => next.and_time(NaiveTime::MIN) - Duration::nanoseconds(1),
            None => NaiveDateTime::MAX,
        }
    }

    /// Human label such as `Mar 2024`.
    pub fn label(&self) -> String {
        self.0.format("%b %Y").to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = String;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got '{}'", s))?;

        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in '{}'", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in '{}'", s))?;

        Self::new(year, month).ok_or_else(|| format!("month out of range in '{}'", s))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inclusive range of months. A range whose start is after its end is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRange {
    pub start: MonthKey,
    pub end: MonthKey,
}

impl MonthRange {
    pub fn new(start: MonthKey, end: MonthKey) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one month.
    #[allow(dead_code)] // Convenience constructor
    pub fn single(month: MonthKey) -> Self {
        Self::new(month, month)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Whether an instant falls between the first instant of `start` and the
    /// last instant of `end`, both inclusive.
    pub fn contains(&self, instant: &NaiveDateTime) -> bool {
        *instant >= self.start.first_instant() && *instant <= self.end.last_instant()
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}
