//! Reading normalized bars from CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use candela_aggregate::{OrderPolicy, enforce_order};
use candela_types::{Bar, CandelaError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};

use crate::schema::{Schema, VolumeRequirement};
use crate::time::parse_time;

/// Options for [`read_bars`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Whether a volume column is required.
    pub volume: VolumeRequirement,
    /// Handling of out-of-order rows.
    pub order: OrderPolicy,
    /// Field delimiter.
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            volume: VolumeRequirement::Optional,
            order: OrderPolicy::Strict,
            delimiter: b',',
        }
    }
}

impl ReadOptions {
    /// Creates options with defaults: optional volume, strict order, comma.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the volume requirement.
    #[must_use]
    pub const fn with_volume(mut self, volume: VolumeRequirement) -> Self {
        self.volume = volume;
        self
    }

    /// Sets the order policy.
    #[must_use]
    pub const fn with_order(mut self, order: OrderPolicy) -> Self {
        self.order = order;
        self
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Reads bars from CSV data with a header row.
///
/// # Errors
///
/// - [`CandelaError::EmptyInput`] if there is no header row
/// - [`CandelaError::MissingColumn`] if a required column is absent
/// - [`CandelaError::Parse`] for a row with an unreadable time or price
/// - [`CandelaError::UnsortedInput`] under [`OrderPolicy::Strict`]
pub fn read_bars<R: Read>(reader: R, options: &ReadOptions) -> Result<Vec<Bar>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(CandelaError::EmptyInput);
    }
    let schema = Schema::resolve(&headers, options.volume)?;

    let mut bars = Vec::new();
    let mut record = StringRecord::new();
    let mut suspect = Vec::new();
    while rdr.read_record(&mut record)? {
        let line = record.position().map_or(0, csv::Position::line);
        let bar = parse_record(&record, &schema, line)?;
        if is_suspect(&bar) {
            suspect.push(line);
        }
        bars.push(bar);
    }

    if let Some(first) = suspect.first() {
        tracing::warn!(
            rows = suspect.len(),
            first_line = *first,
            "non-finite prices or negative volume kept as given"
        );
    }

    enforce_order(&mut bars, options.order)?;

    tracing::debug!(rows = bars.len(), ?schema, "read bars");
    Ok(bars)
}

/// Reads bars from a CSV file.
///
/// # Errors
///
/// Returns [`CandelaError::Io`] if the file cannot be opened, otherwise the
/// errors of [`read_bars`].
pub fn read_bars_from_path(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Vec<Bar>> {
    let file = File::open(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), "reading bars");
    read_bars(file, options)
}

/// Non-finite prices or a negative or NaN volume.
fn is_suspect(bar: &Bar) -> bool {
    let prices = [bar.open, bar.high, bar.low, bar.close];
    prices.iter().any(|p| !p.is_finite()) || bar.volume.is_nan() || bar.volume < 0.0
}

fn parse_record(record: &StringRecord, schema: &Schema, line: u64) -> Result<Bar> {
    let cell = |idx: usize| record.get(idx).unwrap_or("");
    let parse_err = |message: String| CandelaError::Parse { line, message };

    let time_cell = cell(schema.time);
    let timestamp =
        parse_time(time_cell).ok_or_else(|| parse_err(format!("invalid timestamp '{time_cell}'")))?;

    let price = |idx: usize, name: &str| -> Result<f64> {
        let raw = cell(idx);
        raw.parse::<f64>()
            .map_err(|_| parse_err(format!("invalid {name} '{raw}'")))
    };

    let volume = match schema.volume.map(cell) {
        None | Some("") => 0.0,
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| parse_err(format!("invalid volume '{raw}'")))?,
    };

    Ok(Bar::new(
        timestamp,
        price(schema.open, "open")?,
        price(schema.high, "high")?,
        price(schema.low, "low")?,
        price(schema.close, "close")?,
        volume,
    ))
}
