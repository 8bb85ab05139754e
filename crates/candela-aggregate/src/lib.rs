//! OHLCV aggregation for the candela toolkit.
//!
//! This crate re-buckets fine bars into coarser ones and checks sequences
//! before they are aggregated:
//!
//! - [`BarAggregator`] - Streaming bar-to-bar aggregator
//! - [`aggregate`] - Batch aggregation over a slice
//! - [`check_order`], [`dedup`], [`find_gaps`] - Sequence validation

#![doc(issue_tracker_base_url = "https://github.com/candela-rs/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod validate;

pub use aggregator::{BarAggregator, aggregate};
pub use validate::{
    DuplicatePolicy, Gap, OrderPolicy, check_order, dedup, enforce_order, find_gaps,
};
