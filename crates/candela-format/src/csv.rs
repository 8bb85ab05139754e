//! CSV output format.

use candela_indicators::EnrichedBar;
use candela_types::Bar;
use std::io::Write;

use crate::{FormatError, Formatter};

/// CSV formatter.
///
/// Timestamps are written as epoch seconds. An absent ATR is an empty cell.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
    /// Fixed decimal places for numeric columns; shortest round-trip form if unset.
    decimals: Option<usize>,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
            decimals: None,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Rounds numeric columns to a fixed number of decimal places.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter('\t')
    }

    fn num(&self, value: f64) -> String {
        match self.decimals {
            Some(places) => format!("{value:.places$}"),
            None => value.to_string(),
        }
    }

    fn write_row<W: Write>(&self, writer: &mut W, bar: &Bar) -> std::io::Result<()> {
        let d = self.delimiter;
        write!(
            writer,
            "{}{d}{}{d}{}{d}{}{d}{}{d}{}",
            bar.epoch_seconds(),
            self.num(bar.open),
            self.num(bar.high),
            self.num(bar.low),
            self.num(bar.close),
            self.num(bar.volume),
        )
    }
}

impl Formatter for CsvFormatter {
    fn write_bars<W: Write + Send>(&self, bars: &[Bar], mut writer: W) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "timestamp{d}open{d}high{d}low{d}close{d}volume")?;
        }

        for bar in bars {
            self.write_row(&mut writer, bar)?;
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_enriched<W: Write + Send>(
        &self,
        bars: &[EnrichedBar],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(
                writer,
                "timestamp{d}open{d}high{d}low{d}close{d}volume{d}true_range{d}atr"
            )?;
        }

        for row in bars {
            self.write_row(&mut writer, &row.bar)?;
            let atr = row.atr.map(|v| self.num(v)).unwrap_or_default();
            writeln!(writer, "{d}{}{d}{atr}", self.num(row.true_range))?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
