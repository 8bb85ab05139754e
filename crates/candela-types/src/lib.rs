//! Core types for the candela OHLCV toolkit.
//!
//! This crate provides the fundamental data structures shared by every
//! candela crate:
//!
//! - [`Bar`] - A single OHLCV bar with a UTC timestamp
//! - [`Granularity`] - Closed set of bar intervals and bucket arithmetic
//! - [`Period`] - Smoothing window length in bars
//! - [`CandelaError`] - Errors raised across the pipeline
//! - [`check_order`] - Chronological order check shared by aggregation and ATR

#![doc(issue_tracker_base_url = "https://github.com/candela-rs/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod error;
mod granularity;
mod period;

pub use bar::{Bar, check_order};
pub use error::{CandelaError, Result};
pub use granularity::{Granularity, UnsupportedGranularity};
pub use period::Period;
