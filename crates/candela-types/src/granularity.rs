//! Bar granularity definitions and bucket arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed bar interval.
///
/// This is a closed set: anything that is not a minute, hour or day is
/// rejected at parse time rather than silently rescaling a smoothing window.
/// Buckets are aligned to the Unix epoch in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// 1-minute bars.
    Minute,
    /// 1-hour bars.
    Hourly,
    /// Daily bars (UTC midnight to midnight).
    Daily,
}

impl Granularity {
    /// Returns the bucket width in seconds.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        match self {
            Self::Minute => 60,
            Self::Hourly => 3_600,
            Self::Daily => 86_400,
        }
    }

    /// Returns how many bars of this granularity make up one day.
    #[must_use]
    pub const fn bars_per_day(&self) -> usize {
        match self {
            Self::Minute => 1_440,
            Self::Hourly => 24,
            Self::Daily => 1,
        }
    }

    /// Converts a window expressed in calendar days to a bar count.
    ///
    /// Returns `None` if the bar count does not fit in a `usize`.
    #[must_use]
    pub const fn period_bars(&self, days: usize) -> Option<usize> {
        days.checked_mul(self.bars_per_day())
    }

    /// Returns the bucket key (epoch seconds of the bucket start) for a timestamp.
    #[must_use]
    pub fn bucket_key(&self, timestamp: DateTime<Utc>) -> i64 {
        let secs = timestamp.timestamp();
        secs - secs.rem_euclid(self.seconds())
    }

    /// Truncates a timestamp down to the start of its bucket.
    #[must_use]
    pub fn bucket_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        // Only a timestamp inside the first bucket after MIN_UTC can floor out of range.
        DateTime::from_timestamp(self.bucket_key(timestamp), 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns true if `coarser` buckets are whole multiples of this granularity.
    #[must_use]
    pub const fn divides(&self, coarser: Self) -> bool {
        coarser.seconds() % self.seconds() == 0
    }

    /// Returns the granularity as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }

    /// Returns all supported granularities, finest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minute, Self::Hourly, Self::Daily]
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = UnsupportedGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minute" | "min" | "m1" | "1m" | "1min" => Ok(Self::Minute),
            "hourly" | "hour" | "h1" | "1h" => Ok(Self::Hourly),
            "daily" | "day" | "d1" | "1d" => Ok(Self::Daily),
            _ => Err(UnsupportedGranularity(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown granularity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedGranularity(pub String);

impl std::fmt::Display for UnsupportedGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported granularity '{}', expected one of: minute, hourly, daily",
            self.0
        )
    }
}

impl std::error::Error for UnsupportedGranularity {}
