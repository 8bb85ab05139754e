//! Wilder's Average True Range.
//!
//! The first `period - 1` bars have no ATR. Bar `period - 1` is seeded with
//! the arithmetic mean of the first `period` true ranges, and every later bar
//! applies Wilder's recursion:
//!
//! ```text
//! ATR[i] = (ATR[i-1] * (period - 1) + TR[i]) / period
//! ```
//!
//! Each value depends on the whole history since the seed, so bars must be fed
//! in chronological order and the computation cannot be split across threads.

use std::borrow::Borrow;

use candela_types::{Bar, Period, Result, check_order};

use crate::{EnrichedBar, true_range};

/// Running Wilder ATR state.
#[derive(Debug, Clone)]
pub struct WilderAtr {
    period: Period,
    prev_close: Option<f64>,
    seen: usize,
    seed_sum: f64,
    atr: Option<f64>,
}

impl WilderAtr {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new(period: Period) -> Self {
        Self {
            period,
            prev_close: None,
            seen: 0,
            seed_sum: 0.0,
            atr: None,
        }
    }

    /// Returns the smoothing period.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Returns the most recent ATR, if the warm-up is over.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        self.atr
    }

    /// Returns how many bars have been fed.
    #[must_use]
    pub const fn seen(&self) -> usize {
        self.seen
    }

    /// Feeds the next bar, returning its True Range and ATR.
    pub fn update(&mut self, bar: &Bar) -> (f64, Option<f64>) {
        let tr = true_range(bar, self.prev_close);
        self.prev_close = Some(bar.close);
        self.seen += 1;

        let n = self.period.bars() as f64;
        self.atr = match self.atr {
            Some(prev) => Some((prev * (n - 1.0) + tr) / n),
            None => {
                self.seed_sum += tr;
                (self.seen == self.period.bars()).then(|| self.seed_sum / n)
            }
        };

        (tr, self.atr)
    }

    /// Feeds the next bar and wraps the result.
    pub fn enrich(&mut self, bar: &Bar) -> EnrichedBar {
        let (true_range, atr) = self.update(bar);
        EnrichedBar::new(*bar, true_range, atr)
    }
}

/// Iterator adapter that enriches each bar with True Range and ATR.
#[derive(Debug, Clone)]
pub struct AtrIter<I> {
    inner: I,
    state: WilderAtr,
}

impl<I> Iterator for AtrIter<I>
where
    I: Iterator,
    I::Item: Borrow<Bar>,
{
    type Item = EnrichedBar;

    fn next(&mut self) -> Option<Self::Item> {
        let bar = self.inner.next()?;
        Some(self.state.enrich(bar.borrow()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Extension trait adding `.with_atr(period)` to bar iterators.
pub trait AtrExt: Iterator + Sized
where
    Self::Item: Borrow<Bar>,
{
    /// Enriches each bar with True Range and Wilder ATR.
    fn with_atr(self, period: Period) -> AtrIter<Self> {
        AtrIter {
            inner: self,
            state: WilderAtr::new(period),
        }
    }
}

impl<I> AtrExt for I
where
    I: Iterator,
    I::Item: Borrow<Bar>,
{
}

/// Computes True Range and ATR for every bar in order.
///
/// A sequence shorter than `period` yields no ATR at all; that is not an error.
///
/// # Errors
///
/// Returns [`UnsortedInput`](candela_types::CandelaError::UnsortedInput) if
/// any bar is earlier than its predecessor. Bars sharing a timestamp are
/// accepted as they are.
pub fn compute_atr(bars: &[Bar], period: Period) -> Result<Vec<EnrichedBar>> {
    check_order(bars)?;
    let out: Vec<EnrichedBar> = bars.iter().with_atr(period).collect();

    if bars.len() < period.bars() {
        tracing::debug!(
            bars = bars.len(),
            period = period.bars(),
            "sequence shorter than period, no ATR produced"
        );
    } else {
        tracing::debug!(
            bars = bars.len(),
            period = period.bars(),
            last = ?out.last().and_then(|b| b.atr),
            "computed ATR"
        );
    }

    Ok(out)
}
