//! Common value types used throughout Timesheet Approvals RS

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TsError;

/// Valid email pattern
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

/// A span of logged work, in hours
///
/// Stored as whole milliseconds so that sums are exact and independent of
/// summation order. Rounding to two decimals happens only in
/// [`Hours::rounded`] and the `Display` impl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours {
    millis: i64,
}

impl Hours {
    const MILLIS_PER_HOUR: f64 = 3_600_000.0;

    pub const ZERO: Hours = Hours { millis: 0 };

    pub fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    pub fn from_minutes(minutes: i64) -> Self {
        Self::from_millis(minutes * 60_000)
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    /// Exact value in hours
    pub fn as_f64(&self) -> f64 {
        self.millis as f64 / Self::MILLIS_PER_HOUR
    }

    /// Value rounded to two decimal places, for display only
    pub fn rounded(&self) -> f64 {
        (self.as_f64() * 100.0).round() / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.millis == 0
    }
}

impl std::ops::Add for Hours {
    type Output = Hours;

    fn add(self, rhs: Hours) -> Hours {
        Hours::from_millis(self.millis + rhs.millis)
    }
}

impl std::iter::Sum for Hours {
    fn sum<I: Iterator<Item = Hours>>(iter: I) -> Hours {
        iter.fold(Hours::ZERO, |acc, h| acc + h)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

/// A syntactically valid, normalized (trimmed, lowercase) email identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, TsError> {
        let normalized = raw.trim().to_lowercase();
        if EMAIL_PATTERN.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(TsError::unknown_approver(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = TsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = TsError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Create a range; fails when `end` is before `start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TsError> {
        if end < start {
            return Err(TsError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// The period a timesheet covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DateScope {
    Day { date: NaiveDate },
    Range { range: DateRange },
}

impl DateScope {
    pub fn day(date: NaiveDate) -> Self {
        Self::Day { date }
    }

    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, TsError> {
        Ok(Self::Range {
            range: DateRange::new(start, end)?,
        })
    }

    /// The date used for date filtering and display ordering
    pub fn anchor(&self) -> NaiveDate {
        match self {
            Self::Day { date } => *date,
            Self::Range { range } => range.start,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        match self {
            Self::Day { date: d } => *d == date,
            Self::Range { range } => range.contains(date),
        }
    }
}

impl fmt::Display for DateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day { date } => write!(f, "{}", date),
            Self::Range { range } => write!(f, "{} to {}", range.start, range.end),
        }
    }
}
