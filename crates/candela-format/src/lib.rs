//! Output formatters for candela bars.
//!
//! Plain bars and ATR-enriched bars can be written as:
//!
//! - [`CsvFormatter`] - CSV or TSV, epoch-second timestamps
//! - [`JsonFormatter`] - JSON array or NDJSON, RFC 3339 timestamps
//! - [`ParquetFormatter`] - Apache Parquet columnar format

#![doc(issue_tracker_base_url = "https://github.com/candela-rs/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
