//! Apache Parquet output format.

use arrow::array::{ArrayRef, Float64Array, TimestampSecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use candela_indicators::EnrichedBar;
use candela_types::Bar;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Parquet formatter.
///
/// Timestamps are stored as UTC seconds. An absent ATR is a null.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn bar_fields() -> Vec<Field> {
        vec![
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Second, Some("UTC".into())),
                false,
            ),
            Field::new("open", DataType::Float64, false),
            Field::new("high", DataType::Float64, false),
            Field::new("low", DataType::Float64, false),
            Field::new("close", DataType::Float64, false),
            Field::new("volume", DataType::Float64, false),
        ]
    }

    /// Creates the Arrow schema for plain bars.
    fn bar_schema() -> Schema {
        Schema::new(Self::bar_fields())
    }

    /// Creates the Arrow schema for enriched bars.
    fn enriched_schema() -> Schema {
        let mut fields = Self::bar_fields();
        fields.push(Field::new("true_range", DataType::Float64, false));
        fields.push(Field::new("atr", DataType::Float64, true));
        Schema::new(fields)
    }

    fn bar_columns<'a>(bars: impl Iterator<Item = &'a Bar> + Clone) -> Vec<ArrayRef> {
        let col = |f: fn(&Bar) -> f64| -> ArrayRef {
            Arc::new(Float64Array::from_iter_values(bars.clone().map(f)))
        };
        vec![
            Arc::new(
                TimestampSecondArray::from_iter_values(bars.clone().map(Bar::epoch_seconds))
                    .with_timezone("UTC"),
            ),
            col(|b| b.open),
            col(|b| b.high),
            col(|b| b.low),
            col(|b| b.close),
            col(|b| b.volume),
        ]
    }

    fn bars_to_batch(bars: &[Bar]) -> Result<RecordBatch, FormatError> {
        RecordBatch::try_new(Arc::new(Self::bar_schema()), Self::bar_columns(bars.iter()))
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    fn enriched_to_batch(rows: &[EnrichedBar]) -> Result<RecordBatch, FormatError> {
        let mut columns = Self::bar_columns(rows.iter().map(|r| &r.bar));
        columns.push(Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| r.true_range),
        )));
        columns.push(Arc::new(rows.iter().map(|r| r.atr).collect::<Float64Array>()));

        RecordBatch::try_new(Arc::new(Self::enriched_schema()), columns)
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    fn write_batches<W, T, F>(
        &self,
        rows: &[T],
        schema: Schema,
        to_batch: F,
        writer: W,
    ) -> Result<(), FormatError>
    where
        W: Write + Send,
        F: Fn(&[T]) -> Result<RecordBatch, FormatError>,
    {
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::new(schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in rows.chunks(self.row_group_size.max(1)) {
            let batch = to_batch(chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        let mut writer = arrow_writer
            .into_inner()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;
        writer.flush()?;

        Ok(())
    }
}

impl Formatter for ParquetFormatter {
    fn write_bars<W: Write + Send>(&self, bars: &[Bar], writer: W) -> Result<(), FormatError> {
        self.write_batches(bars, Self::bar_schema(), Self::bars_to_batch, writer)
    }

    fn write_enriched<W: Write + Send>(
        &self,
        bars: &[EnrichedBar],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_batches(bars, Self::enriched_schema(), Self::enriched_to_batch, writer)
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use std::io::Cursor;

    fn create_test_bar() -> Bar {
        Bar::from_epoch(1_705_321_845, 1.1001, 1.1010, 1.0990, 1.1005, 300.0).unwrap()
    }

    #[test]
    fn test_parquet_bars() {
        let formatter = ParquetFormatter::new();
        let mut output = Cursor::new(Vec::new());

        formatter.write_bars(&[create_test_bar()], &mut output).unwrap();

        // Parquet files start with "PAR1" magic bytes
        let data = output.into_inner();
        assert!(data.len() > 4);
        assert_eq!(&data[0..4], b"PAR1");
    }

    #[test]
    fn test_enriched_schema() {
        let schema = ParquetFormatter::enriched_schema();
        assert_eq!(schema.fields().len(), 8);
        assert!(schema.field_with_name("atr").unwrap().is_nullable());
        assert!(!schema.field_with_name("true_range").unwrap().is_nullable());
    }

    #[test]
    fn test_absent_atr_is_null() {
        let rows = vec![
            EnrichedBar::new(create_test_bar(), 0.002, None),
            EnrichedBar::new(create_test_bar(), 0.001, Some(0.0015)),
        ];
        let batch = ParquetFormatter::enriched_to_batch(&rows).unwrap();
        let atr = batch.column_by_name("atr").unwrap();
        assert!(atr.is_null(0));
        assert!(!atr.is_null(1));
    }
}
