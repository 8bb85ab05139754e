//! OHLCV bar representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CandelaError, Result};

/// A single OHLCV bar (candlestick).
///
/// Prices are taken as given: a bar whose `low` exceeds its `high` is not
/// rejected, and every computation downstream uses the raw fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time (UTC, whole seconds).
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price during the bar.
    pub high: f64,
    /// Lowest price during the bar.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume, 0 when the source had none.
    pub volume: f64,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Creates a bar from epoch seconds.
    ///
    /// Returns `None` if the timestamp is outside chrono's representable range.
    #[must_use]
    pub fn from_epoch(
        secs: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(|ts| Self::new(ts, open, high, low, close, volume))
    }

    /// Returns the timestamp as epoch seconds.
    #[must_use]
    pub fn epoch_seconds(&self) -> i64 {
        self.timestamp.timestamp()
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns true if this is a bullish (green) bar.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if this is a bearish (red) bar.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Returns the typical price ((high + low + close) / 3).
    #[must_use]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Returns true if `low <= open, close <= high` and volume is non-negative.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.low <= self.high
            && (self.low..=self.high).contains(&self.open)
            && (self.low..=self.high).contains(&self.close)
            && self.volume >= 0.0
    }
}

/// Verifies timestamps never decrease.
///
/// # Errors
///
/// Returns [`CandelaError::UnsortedInput`] at the first bar earlier than its
/// predecessor.
pub fn check_order(bars: &[Bar]) -> Result<()> {
    for (index, pair) in bars.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(CandelaError::UnsortedInput {
                index: index + 1,
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn create_test_bar() -> Bar {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Bar::new(timestamp, 100.0, 105.0, 95.0, 102.0, 1000.0)
    }

    #[test]
    fn test_range_and_body() {
        let bar = create_test_bar();
        assert_relative_eq!(bar.range(), 10.0);
        assert_relative_eq!(bar.body(), 2.0);
    }

    #[test]
    fn test_direction() {
        let bar = create_test_bar();
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());

        let down = Bar { close: 98.0, ..bar };
        assert!(down.is_bearish());
    }

    #[test]
    fn test_typical_price() {
        let bar = create_test_bar();
        assert_relative_eq!(bar.typical_price(), (105.0 + 95.0 + 102.0) / 3.0);
    }

    #[test]
    fn test_well_formed() {
        let bar = create_test_bar();
        assert!(bar.is_well_formed());

        let inverted = Bar {
            high: 90.0,
            ..bar
        };
        assert!(!inverted.is_well_formed());

        let nan = Bar {
            open: f64::NAN,
            ..bar
        };
        assert!(!nan.is_well_formed());

        let negative = Bar {
            volume: -1.0,
            ..bar
        };
        assert!(!negative.is_well_formed());
    }

    #[test]
    fn test_from_epoch() {
        let bar = Bar::from_epoch(3600, 1.0, 2.0, 0.5, 1.5, 0.0).unwrap();
        assert_eq!(bar.epoch_seconds(), 3600);
        assert_eq!(bar.timestamp, Utc.with_ymd_and_hms(1970, 1, 1, 1, 0, 0).unwrap());
    }
}
