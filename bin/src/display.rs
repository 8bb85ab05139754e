//! Display utilities, input reading and output formatting for the candela CLI.

use anyhow::{Context, Result, bail};
use candela_lib::prelude::*;
use candela_lib::{FormatError, VolumeRequirement};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output format for written bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Tsv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Where bars come from.
#[derive(Debug, Args)]
pub(crate) struct InputArgs {
    /// Input CSV file ("-" reads stdin)
    pub(crate) input: PathBuf,

    /// Field delimiter of the input
    #[arg(long, default_value = ",")]
    pub(crate) delimiter: char,

    /// Fail if the input has no volume column
    #[arg(long, conflicts_with = "allow_missing_volume")]
    pub(crate) require_volume: bool,

    /// Read a missing volume column as zero volume even when aggregating
    #[arg(long)]
    pub(crate) allow_missing_volume: bool,

    /// Sort out-of-order input instead of failing
    #[arg(long)]
    pub(crate) sort: bool,
}

impl InputArgs {
    /// Builds reader options, letting `--sort` override the configured policy.
    ///
    /// Volume is required when the bars are going to be combined into
    /// coarser buckets, unless `--allow-missing-volume` is given.
    pub(crate) fn read_options(
        &self,
        order: OrderPolicy,
        aggregating: bool,
    ) -> Result<ReadOptions> {
        let delimiter = u8::try_from(self.delimiter)
            .with_context(|| format!("Delimiter must be a single byte: {:?}", self.delimiter))?;
        let volume = if self.require_volume || (aggregating && !self.allow_missing_volume) {
            VolumeRequirement::Required
        } else {
            VolumeRequirement::Optional
        };
        let order = if self.sort { OrderPolicy::Sort } else { order };

        Ok(ReadOptions::new()
            .with_delimiter(delimiter)
            .with_volume(volume)
            .with_order(order))
    }
}

/// Where bars go.
#[derive(Debug, Args)]
pub(crate) struct OutputArgs {
    /// Output file path. Defaults to stdout
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub(crate) format: Format,

    /// Round numeric CSV columns to this many decimal places
    #[arg(long)]
    pub(crate) decimals: Option<usize>,

    /// Pretty-print JSON arrays
    #[arg(long)]
    pub(crate) pretty: bool,
}

/// ATR window flags; `--period` and `--days` are mutually exclusive.
#[derive(Debug, Args)]
pub(crate) struct AtrArgs {
    /// ATR period in bars
    #[arg(long, conflicts_with = "days")]
    pub(crate) period: Option<usize>,

    /// ATR period in calendar days, scaled by bar granularity
    #[arg(long)]
    pub(crate) days: Option<usize>,
}

impl AtrArgs {
    /// Returns the window given on the command line, if any.
    pub(crate) fn window(&self) -> Option<AtrWindow> {
        self.period
            .map(AtrWindow::Bars)
            .or_else(|| self.days.map(AtrWindow::Days))
    }
}

/// Rows handed to a formatter.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Rows<'a> {
    Bars(&'a [Bar]),
    Enriched(&'a [EnrichedBar]),
}

impl Rows<'_> {
    const fn len(&self) -> usize {
        match self {
            Self::Bars(bars) => bars.len(),
            Self::Enriched(rows) => rows.len(),
        }
    }
}

/// Creates a spinner for a long-running step, hidden in quiet mode.
pub(crate) fn spinner(quiet: bool, message: String) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Reads bars from a file or stdin with a spinner.
pub(crate) fn read_input(
    args: &InputArgs,
    options: &ReadOptions,
    quiet: bool,
) -> Result<Vec<Bar>> {
    let name = args.input.display().to_string();
    let progress = spinner(quiet, format!("Reading {name}"))?;

    let bars = if args.input == Path::new("-") {
        read_bars(std::io::stdin().lock(), options)
    } else {
        read_bars_from_path(&args.input, options)
    };

    match bars {
        Ok(bars) => {
            progress.finish_with_message(format!("Read {} bars from {name}", bars.len()));
            Ok(bars)
        }
        Err(err) => {
            progress.abandon();
            Err(explain(err).context(format!("Failed to read {name}")))
        }
    }
}

/// Loads the base pipeline configuration, from a file if one was given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn emit<F: Formatter, W: Write + Send>(
    formatter: &F,
    rows: Rows<'_>,
    writer: W,
) -> Result<(), FormatError> {
    match rows {
        Rows::Bars(bars) => formatter.write_bars(bars, writer),
        Rows::Enriched(rows) => formatter.write_enriched(rows, writer),
    }
}

/// Writes rows to `args.output` (or stdout) in the requested format.
pub(crate) fn write_rows(rows: Rows<'_>, args: &OutputArgs, quiet: bool) -> Result<()> {
    let mut writer: Box<dyn Write + Send> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    let csv = |formatter: CsvFormatter| match args.decimals {
        Some(places) => formatter.with_decimals(places),
        None => formatter,
    };

    match args.format {
        Format::Csv => emit(&csv(CsvFormatter::new()), rows, &mut writer)?,
        Format::Tsv => emit(&csv(CsvFormatter::tsv()), rows, &mut writer)?,
        Format::Json => emit(&JsonFormatter::new().with_pretty(args.pretty), rows, &mut writer)?,
        Format::Ndjson => emit(&JsonFormatter::ndjson(), rows, &mut writer)?,
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                emit(&candela_lib::ParquetFormatter::new(), rows, &mut writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                bail!("Parquet support not compiled in");
            }
        }
    }
    writer.flush().context("Failed to flush output")?;

    if !quiet && let Some(path) = &args.output {
        eprintln!("Wrote {} rows to {}", rows.len(), path.display());
    }

    Ok(())
}

/// Converts a library error, adding a hint for out-of-order input.
pub(crate) fn explain(err: CandelaError) -> anyhow::Error {
    let unsorted = matches!(err, CandelaError::UnsortedInput { .. });
    let err = anyhow::Error::new(err);
    if unsorted {
        err.context("Input is not in chronological order (pass --sort to reorder)")
    } else {
        err
    }
}

/// Rejects binary output to the terminal.
pub(crate) fn check_terminal_output(args: &OutputArgs) -> Result<()> {
    if args.output.is_none() && args.format == Format::Parquet {
        bail!("Parquet output needs --output");
    }
    Ok(())
}
