//! True Range and Wilder ATR for the candela toolkit.
//!
//! - [`true_range`] / [`true_ranges`] - Per-bar True Range
//! - [`WilderAtr`] - Running ATR state, fed one bar at a time
//! - [`AtrExt::with_atr`] - Iterator adapter yielding [`EnrichedBar`]s
//! - [`compute_atr`] - Batch ATR over a slice
//! - [`project_atr`] / [`project_onto`] - Copy coarse ATR onto fine bars

#![doc(issue_tracker_base_url = "https://github.com/candela-rs/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod atr;
mod enriched;
mod project;
mod true_range;

pub use atr::{AtrExt, AtrIter, WilderAtr, compute_atr};
pub use enriched::EnrichedBar;
pub use project::{Projection, project_atr, project_onto};
pub use true_range::{true_range, true_ranges};
