//! Smoothing window length.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::{CandelaError, Granularity, Result};

/// A smoothing period, counted in bars of the sequence it is applied to.
///
/// Calendar-day windows must be converted with [`Period::from_days`] using the
/// granularity of the bars, never passed through directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(NonZeroUsize);

impl Period {
    /// The classic Wilder window of 14 bars.
    pub const WILDER: Self = Self(NonZeroUsize::new(14).expect("14 is non-zero"));

    /// Creates a period from a bar count.
    ///
    /// # Errors
    ///
    /// Returns [`CandelaError::InvalidPeriod`] if `bars` is zero.
    pub fn new(bars: usize) -> Result<Self> {
        NonZeroUsize::new(bars)
            .map(Self)
            .ok_or(CandelaError::InvalidPeriod)
    }

    /// Creates a period covering `days` calendar days of `granularity` bars.
    ///
    /// # Errors
    ///
    /// Returns [`CandelaError::InvalidPeriod`] if `days` is zero or the bar
    /// count overflows.
    pub fn from_days(days: usize, granularity: Granularity) -> Result<Self> {
        granularity
            .period_bars(days)
            .ok_or(CandelaError::InvalidPeriod)
            .and_then(Self::new)
    }

    /// Returns the number of bars in the period.
    #[must_use]
    pub const fn bars(&self) -> usize {
        self.0.get()
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bars", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_new() {
        assert_eq!(Period::new(3).unwrap().bars(), 3);
        assert!(matches!(Period::new(0), Err(CandelaError::InvalidPeriod)));
    }

    #[test]
    fn test_period_from_days() {
        assert_eq!(
            Period::from_days(14, Granularity::Hourly).unwrap().bars(),
            336
        );
        assert_eq!(Period::from_days(14, Granularity::Daily).unwrap(), Period::WILDER);
        assert!(Period::from_days(0, Granularity::Minute).is_err());
    }

    #[test]
    fn test_period_from_days_overflow() {
        assert!(matches!(
            Period::from_days(usize::MAX / 100, Granularity::Minute),
            Err(CandelaError::InvalidPeriod)
        ));
        assert_eq!(
            Period::from_days(usize::MAX, Granularity::Daily).unwrap().bars(),
            usize::MAX
        );
    }

    #[test]
    fn test_period_serde() {
        let period = Period::new(24).unwrap();
        assert_eq!(serde_json::to_string(&period).unwrap(), "24");
        assert!(serde_json::from_str::<Period>("0").is_err());
    }
}
