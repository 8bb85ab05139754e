//! Bars carrying their derived volatility values.

use candela_types::Bar;
use serde::{Deserialize, Serialize};

/// A bar with its True Range and, after the warm-up, its ATR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBar {
    /// The source bar.
    #[serde(flatten)]
    pub bar: Bar,
    /// True Range of the bar.
    pub true_range: f64,
    /// Wilder ATR; `None` during the warm-up.
    pub atr: Option<f64>,
}

impl EnrichedBar {
    /// Creates a new enriched bar.
    #[must_use]
    pub const fn new(bar: Bar, true_range: f64, atr: Option<f64>) -> Self {
        Self {
            bar,
            true_range,
            atr,
        }
    }

    /// Returns true once the ATR warm-up is over.
    #[must_use]
    pub const fn has_atr(&self) -> bool {
        self.atr.is_some()
    }

    /// ATR as a fraction of the close, e.g. for position sizing.
    #[must_use]
    pub fn atr_percent(&self) -> Option<f64> {
        self.atr
            .filter(|_| self.bar.close != 0.0)
            .map(|atr| atr / self.bar.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(atr: Option<f64>) -> EnrichedBar {
        let bar = Bar::from_epoch(1_704_067_200, 100.0, 105.0, 95.0, 100.0, 12.5).unwrap();
        EnrichedBar::new(bar, 10.0, atr)
    }

    #[test]
    fn test_absent_atr_is_null_in_json() {
        let json = serde_json::to_string(&sample(None)).unwrap();
        assert!(json.contains("\"atr\":null"));
        assert!(json.contains("\"high\":105.0"));

        let back: EnrichedBar = serde_json::from_str(&json).unwrap();
        assert!(back.atr.is_none());
    }

    #[test]
    fn test_atr_percent() {
        assert_relative_eq!(sample(Some(2.0)).atr_percent().unwrap(), 0.02);
        assert!(sample(None).atr_percent().is_none());
        assert!(sample(Some(2.0)).has_atr());
    }
}
