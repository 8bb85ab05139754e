//! ATR command implementation.
//!
//! Computes True Range and Wilder ATR over bars as they are, without
//! re-bucketing them.

use crate::commands::run_pipeline;
use crate::display::{AtrArgs, InputArgs, OutputArgs, Rows, check_terminal_output, write_rows};
use anyhow::{Context, Result};
use candela_lib::prelude::*;
use clap::Args;

/// Arguments for `candela atr`.
#[derive(Debug, Args)]
pub(crate) struct AtrCommandArgs {
    #[command(flatten)]
    pub(crate) input: InputArgs,

    /// Granularity of the input bars; used to convert --days into bars
    #[arg(short, long)]
    pub(crate) granularity: Option<Granularity>,

    #[command(flatten)]
    pub(crate) atr: AtrArgs,

    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

/// Picks the ATR window: command line first, then config, then 14 bars.
pub(crate) fn resolve_window(args: &AtrArgs, config: &PipelineConfig) -> AtrWindow {
    args.window()
        .or(config.atr)
        .unwrap_or(AtrWindow::Bars(Period::WILDER.bars()))
}

/// Compute ATR over the input bars and write enriched rows.
pub(crate) fn atr(args: &AtrCommandArgs, config: PipelineConfig, quiet: bool) -> Result<()> {
    check_terminal_output(&args.output)?;

    let granularity = args.granularity.unwrap_or(config.source);
    let window = resolve_window(&args.atr, &config);
    let config = config
        .with_source(granularity)
        .with_target(granularity)
        .with_atr(window);

    let output = run_pipeline(&args.input, config, quiet)?;
    let enriched = output.enriched.context("ATR was not computed")?;
    tracing::info!(%window, bars = enriched.len(), "computed ATR");

    write_rows(Rows::Enriched(&enriched), &args.output, quiet)
}
