//! CSV ingestion adapter for the candela toolkit.
//!
//! Source files disagree on column names (`Volume` vs `Volume BTC`, `Date`
//! strings vs `Timestamp` epoch seconds). This crate resolves those variants
//! once, at the boundary, and hands the rest of candela a plain [`Bar`]
//! sequence:
//!
//! - [`Schema`] - Column positions resolved from a header row
//! - [`read_bars`] / [`read_bars_from_path`] - CSV to bars
//! - [`ReadOptions`] - Volume requirement, order policy, delimiter
//!
//! [`Bar`]: candela_types::Bar

#![doc(issue_tracker_base_url = "https://github.com/candela-rs/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod reader;
mod schema;
mod time;

pub use candela_aggregate::OrderPolicy;
pub use reader::{ReadOptions, read_bars, read_bars_from_path};
pub use schema::{Schema, VolumeRequirement};
