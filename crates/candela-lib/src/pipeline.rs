//! End-to-end run: order check, dedup, aggregation, gap scan, ATR.

use candela_aggregate::{Gap, aggregate, dedup, enforce_order, find_gaps};
use candela_indicators::{EnrichedBar, compute_atr};
use candela_types::{Bar, CandelaError, Granularity, Result};
use serde::Serialize;

use crate::PipelineConfig;

/// Result of a [`Pipeline::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// Granularity of [`bars`](Self::bars).
    pub granularity: Granularity,
    /// Aggregated bars, one per non-empty bucket.
    pub bars: Vec<Bar>,
    /// Bars with True Range and ATR; present when an ATR window is configured.
    pub enriched: Option<Vec<EnrichedBar>>,
    /// Runs of empty buckets in the output.
    pub gaps: Vec<Gap>,
    /// Input bars removed by the duplicate policy.
    pub duplicates_dropped: usize,
    /// Whether the input had to be sorted.
    pub reordered: bool,
}

impl PipelineOutput {
    /// Total number of empty buckets across all gaps.
    #[must_use]
    pub fn missing_buckets(&self) -> u64 {
        self.gaps.iter().map(|g| g.missing).sum()
    }
}

/// Runs a [`PipelineConfig`] over bar sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline.
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline over `bars` at the configured source granularity.
    ///
    /// # Errors
    ///
    /// - [`CandelaError::IncompatibleGranularity`] if the target is not a whole
    ///   multiple of the source
    /// - [`CandelaError::InvalidPeriod`] for a zero ATR window
    /// - [`CandelaError::UnsortedInput`] under
    ///   [`OrderPolicy::Strict`](candela_aggregate::OrderPolicy::Strict)
    pub fn run(&self, bars: &[Bar]) -> Result<PipelineOutput> {
        let PipelineConfig {
            source,
            target,
            duplicates,
            order,
            ..
        } = self.config;

        if !source.divides(target) {
            return Err(CandelaError::IncompatibleGranularity { input: source, target });
        }
        let period = self.config.period()?;

        let mut input = bars.to_vec();
        let reordered = enforce_order(&mut input, order)?;
        let (input, duplicates_dropped) = dedup(&input, duplicates);
        let input_bars = input.len();

        let bars = aggregate(&input, target)?;
        let gaps = find_gaps(&bars, target);
        let enriched = period.map(|period| compute_atr(&bars, period)).transpose()?;

        tracing::info!(
            input = input_bars,
            output = bars.len(),
            %target,
            gaps = gaps.len(),
            duplicates_dropped,
            "pipeline finished"
        );

        Ok(PipelineOutput {
            granularity: target,
            bars,
            enriched,
            gaps,
            duplicates_dropped,
            reordered,
        })
    }

    /// Reads CSV bars and runs the pipeline over them.
    ///
    /// The configured order policy is applied while reading. When the source
    /// and target granularities differ, a volume column is required whatever
    /// `options` says.
    ///
    /// # Errors
    ///
    /// Returns the ingestion errors of
    /// [`read_bars`](candela_ingest::read_bars), otherwise those of
    /// [`Pipeline::run`].
    #[cfg(feature = "ingest")]
    pub fn run_csv<R: std::io::Read>(
        &self,
        reader: R,
        options: &candela_ingest::ReadOptions,
    ) -> Result<PipelineOutput> {
        let mut options = options.with_order(self.config.order);
        if self.config.source != self.config.target {
            options = options.with_volume(candela_ingest::VolumeRequirement::Required);
        }
        let bars = candela_ingest::read_bars(reader, &options)?;
        self.run(&bars)
    }
}
