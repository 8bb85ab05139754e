//! Aggregate command implementation.
//!
//! Re-buckets fine bars into a coarser granularity without computing ATR.

use crate::commands::run_pipeline;
use crate::display::{InputArgs, OutputArgs, Rows, check_terminal_output, write_rows};
use anyhow::Result;
use candela_lib::prelude::*;
use clap::Args;

/// Arguments for `candela aggregate`.
#[derive(Debug, Args)]
pub(crate) struct AggregateArgs {
    #[command(flatten)]
    pub(crate) input: InputArgs,

    /// Granularity of the input bars (minute, hourly, daily)
    #[arg(long)]
    pub(crate) from: Option<Granularity>,

    /// Granularity to aggregate into
    #[arg(short, long)]
    pub(crate) to: Option<Granularity>,

    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

/// Aggregate bars and write them out.
pub(crate) fn aggregate(args: &AggregateArgs, config: PipelineConfig, quiet: bool) -> Result<()> {
    check_terminal_output(&args.output)?;

    let config = config
        .with_source(args.from.unwrap_or(config.source))
        .with_target(args.to.unwrap_or(config.target))
        .without_atr();

    let output = run_pipeline(&args.input, config, quiet)?;
    write_rows(Rows::Bars(&output.bars), &args.output, quiet)
}
