//! Run command implementation.
//!
//! Aggregates fine bars and computes ATR over the aggregated bars in one pass.

use crate::commands::atr::resolve_window;
use crate::commands::run_pipeline;
use crate::display::{AtrArgs, InputArgs, OutputArgs, Rows, check_terminal_output, write_rows};
use anyhow::{Context, Result};
use candela_lib::prelude::*;
use clap::Args;

/// Arguments for `candela run`.
#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub(crate) input: InputArgs,

    /// Granularity of the input bars (minute, hourly, daily)
    #[arg(long)]
    pub(crate) from: Option<Granularity>,

    /// Granularity to aggregate into before computing ATR
    #[arg(short, long)]
    pub(crate) to: Option<Granularity>,

    #[command(flatten)]
    pub(crate) atr: AtrArgs,

    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

/// Aggregate, compute ATR and write enriched rows.
pub(crate) fn run(args: &RunArgs, config: PipelineConfig, quiet: bool) -> Result<()> {
    check_terminal_output(&args.output)?;

    let window = resolve_window(&args.atr, &config);
    let config = config
        .with_source(args.from.unwrap_or(config.source))
        .with_target(args.to.unwrap_or(config.target))
        .with_atr(window);

    let output = run_pipeline(&args.input, config, quiet)?;
    let enriched = output.enriched.context("ATR was not computed")?;

    if !quiet {
        let warmed = enriched.iter().filter(|e| e.has_atr()).count();
        eprintln!(
            "{} {} bars, {} with ATR ({window})",
            enriched.len(),
            output.granularity,
            warmed
        );
    }

    write_rows(Rows::Enriched(&enriched), &args.output, quiet)
}
