//! OHLCV re-aggregation and Wilder ATR.
//!
//! This is a facade crate that re-exports functionality from the candela
//! workspace crates and adds a configurable [`Pipeline`] over them.
//!
//! # Quick Start
//!
//! ```
//! use candela_lib::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let minutes: Vec<Bar> = (0..180)
//!     .filter_map(|i| Bar::from_epoch(i * 60, 100.0, 101.0, 99.0, 100.5, 1.0))
//!     .collect();
//!
//! let config = PipelineConfig::new()
//!     .with_target(Granularity::Hourly)
//!     .with_atr(AtrWindow::Bars(2));
//! let output = Pipeline::new(config).run(&minutes)?;
//!
//! assert_eq!(output.bars.len(), 3);
//! let enriched = output.enriched.unwrap_or_default();
//! assert!(enriched[0].atr.is_none());
//! assert!(enriched[1].atr.is_some());
//! # Ok(())
//! # }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/candela-rs/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod pipeline;

pub use config::{AtrWindow, PipelineConfig};
pub use pipeline::{Pipeline, PipelineOutput};

// Re-export core types
pub use candela_types::*;

// Re-export aggregation and validation
pub use candela_aggregate::{
    BarAggregator, DuplicatePolicy, Gap, OrderPolicy, aggregate, dedup, enforce_order, find_gaps,
};

// Re-export indicators
pub use candela_indicators::{
    AtrExt, AtrIter, EnrichedBar, Projection, WilderAtr, compute_atr, project_atr, project_onto,
    true_range, true_ranges,
};

// Re-export ingestion
#[cfg(feature = "ingest")]
pub use candela_ingest::{ReadOptions, Schema, VolumeRequirement, read_bars, read_bars_from_path};

// Re-export formatters
#[cfg(feature = "format")]
pub use candela_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use candela_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use candela_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candela_types::{Bar, CandelaError, Granularity, Period, Result};

    pub use candela_aggregate::{BarAggregator, DuplicatePolicy, Gap, OrderPolicy, aggregate};

    pub use candela_indicators::{AtrExt, EnrichedBar, Projection, WilderAtr, compute_atr};

    pub use crate::{AtrWindow, Pipeline, PipelineConfig, PipelineOutput};

    #[cfg(feature = "ingest")]
    pub use candela_ingest::{ReadOptions, read_bars, read_bars_from_path};

    #[cfg(feature = "format")]
    pub use candela_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use candela_format::ParquetFormatter;
}
