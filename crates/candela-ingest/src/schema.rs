//! Column resolution for heterogeneous OHLCV CSV headers.

use candela_types::{CandelaError, Result};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// Header names accepted for the time column, in priority order.
const TIME_COLUMNS: &[&str] = &[
    "timestamp",
    "unix",
    "epoch",
    "datetime",
    "date",
    "time",
    "open_time",
];

/// Whether a volume column must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeRequirement {
    /// Missing volume column is an error.
    Required,
    /// Missing volume column reads as zero volume.
    #[default]
    Optional,
}

/// Positions of the OHLCV fields within a CSV record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Time column (epoch seconds, epoch milliseconds or a date-time string).
    pub time: usize,
    /// Open price column.
    pub open: usize,
    /// High price column.
    pub high: usize,
    /// Low price column.
    pub low: usize,
    /// Close price column.
    pub close: usize,
    /// Volume column, if any.
    pub volume: Option<usize>,
}

impl Schema {
    /// Resolves column positions from a header row.
    ///
    /// Matching ignores case and surrounding whitespace. Volume is taken from
    /// a column named exactly `volume`, otherwise from the first column whose
    /// name starts with `volume` (e.g. `Volume BTC`).
    ///
    /// # Errors
    ///
    /// Returns [`CandelaError::MissingColumn`] naming the first required field
    /// that could not be located.
    pub fn resolve(headers: &StringRecord, volume: VolumeRequirement) -> Result<Self> {
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &str| names.iter().position(|n| n == name);
        let require =
            |name: &str| find(name).ok_or_else(|| CandelaError::MissingColumn(name.to_string()));

        let time = TIME_COLUMNS
            .iter()
            .find_map(|name| find(*name))
            .ok_or_else(|| CandelaError::MissingColumn("timestamp".to_string()))?;

        let volume_col =
            find("volume").or_else(|| names.iter().position(|n| n.starts_with("volume")));
        if volume == VolumeRequirement::Required && volume_col.is_none() {
            return Err(CandelaError::MissingColumn("volume".to_string()));
        }

        Ok(Self {
            time,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: volume_col,
        })
    }
}
