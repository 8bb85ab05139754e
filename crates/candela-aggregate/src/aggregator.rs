//! Streaming bar-to-bar OHLCV aggregation.

use candela_types::{Bar, CandelaError, Granularity, Result};
use chrono::{DateTime, Utc};

/// Streaming bar aggregator.
///
/// Folds an ordered sequence of fine bars into one bar per non-empty bucket
/// of the configured granularity. Output bars are stamped with the bucket
/// start in UTC. Bars sharing a timestamp are folded in arrival order, so the
/// later one supplies the close.
#[derive(Debug)]
pub struct BarAggregator {
    granularity: Granularity,
    current_bar: Option<BarBuilder>,
    last_timestamp: Option<DateTime<Utc>>,
    seen: usize,
}

impl BarAggregator {
    /// Creates a new aggregator for the given granularity.
    #[must_use]
    pub const fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            current_bar: None,
            last_timestamp: None,
            seen: 0,
        }
    }

    /// Returns the granularity being aggregated to.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Processes a bar, potentially emitting a completed bucket.
    ///
    /// Returns `Ok(Some(bar))` when this bar opens a new bucket and thereby
    /// completes the previous one, `Ok(None)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`CandelaError::UnsortedInput`] if the bar is earlier than the
    /// previous one. The aggregator state is left untouched in that case.
    pub fn process(&mut self, bar: &Bar) -> Result<Option<Bar>> {
        if let Some(previous) = self.last_timestamp
            && bar.timestamp < previous
        {
            return Err(CandelaError::UnsortedInput {
                index: self.seen,
                previous,
                current: bar.timestamp,
            });
        }
        self.last_timestamp = Some(bar.timestamp);
        self.seen += 1;

        let bucket = self.granularity.bucket_start(bar.timestamp);

        match self.current_bar.take() {
            Some(mut builder) if builder.timestamp == bucket => {
                builder.update(bar);
                self.current_bar = Some(builder);
                Ok(None)
            }
            Some(builder) => {
                self.current_bar = Some(BarBuilder::new(bucket, bar));
                Ok(Some(builder.finish()))
            }
            None => {
                self.current_bar = Some(BarBuilder::new(bucket, bar));
                Ok(None)
            }
        }
    }

    /// Finishes aggregation, returning any remaining partial bucket.
    #[must_use]
    pub fn finish(self) -> Option<Bar> {
        self.current_bar.map(BarBuilder::finish)
    }
}

/// Aggregates an ordered bar sequence into `granularity` buckets.
///
/// Empty input yields an empty output. Buckets with no source bars are not
/// emitted.
///
/// # Errors
///
/// Returns [`CandelaError::UnsortedInput`] if timestamps decrease anywhere.
pub fn aggregate(bars: &[Bar], granularity: Granularity) -> Result<Vec<Bar>> {
    let mut aggregator = BarAggregator::new(granularity);
    let mut out = Vec::new();

    for bar in bars {
        if let Some(done) = aggregator.process(bar)? {
            out.push(done);
        }
    }

    if let Some(done) = aggregator.finish() {
        out.push(done);
    }

    tracing::debug!(
        %granularity,
        input = bars.len(),
        output = out.len(),
        "aggregated bars"
    );

    Ok(out)
}

/// Accumulator for one bucket.
#[derive(Debug)]
struct BarBuilder {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl BarBuilder {
    /// Starts a bucket from its first source bar.
    const fn new(timestamp: DateTime<Utc>, bar: &Bar) -> Self {
        Self {
            timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }

    fn update(&mut self, bar: &Bar) {
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
        self.close = bar.close;
        self.volume += bar.volume;
    }

    const fn finish(self) -> Bar {
        Bar::new(
            self.timestamp,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        )
    }
}
