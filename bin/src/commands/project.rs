//! Project command implementation.
//!
//! Copies ATR computed on coarse bars (hourly, daily) onto every fine bar
//! that falls inside each coarse bucket.

use crate::commands::atr::resolve_window;
use crate::display::{
    AtrArgs, InputArgs, OutputArgs, Rows, check_terminal_output, explain, read_input, write_rows,
};
use anyhow::{Context, Result};
use candela_lib::prelude::*;
use candela_lib::project_onto;
use clap::Args;
use std::path::PathBuf;

/// Arguments for `candela project`.
#[derive(Debug, Args)]
pub(crate) struct ProjectArgs {
    // fine bars to enrich
    #[command(flatten)]
    pub(crate) input: InputArgs,

    /// Coarse bars to take ATR from. Aggregated from the input when omitted
    #[arg(long)]
    pub(crate) coarse: Option<PathBuf>,

    /// Granularity of the fine bars
    #[arg(long)]
    pub(crate) from: Option<Granularity>,

    /// Granularity of the coarse bars
    #[arg(short, long)]
    pub(crate) to: Option<Granularity>,

    #[command(flatten)]
    pub(crate) atr: AtrArgs,

    /// Take ATR from the previous completed coarse bucket
    #[arg(long)]
    pub(crate) lag: bool,

    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

/// Project coarse ATR onto fine bars and write enriched rows.
pub(crate) fn project(args: &ProjectArgs, config: PipelineConfig, quiet: bool) -> Result<()> {
    check_terminal_output(&args.output)?;

    let window = resolve_window(&args.atr, &config);
    let config = config
        .with_source(args.from.unwrap_or(config.source))
        .with_target(args.to.unwrap_or(config.target))
        .with_atr(window);
    if !config.source.divides(config.target) {
        return Err(explain(CandelaError::IncompatibleGranularity {
            input: config.source,
            target: config.target,
        }));
    }

    let aggregating = args.coarse.is_none() && config.source != config.target;
    let options = args.input.read_options(config.order, aggregating)?;
    let fine = read_input(&args.input, &options, quiet)?;

    let coarse = match &args.coarse {
        Some(path) => {
            let coarse_input = InputArgs {
                input: path.clone(),
                delimiter: args.input.delimiter,
                require_volume: false,
                allow_missing_volume: true,
                sort: args.input.sort,
            };
            let coarse_options = coarse_input.read_options(config.order, false)?;
            let bars = read_input(&coarse_input, &coarse_options, quiet)?;
            let period = window.period(config.target).map_err(explain)?;
            compute_atr(&bars, period).map_err(explain)?
        }
        None => Pipeline::new(config)
            .run(&fine)
            .map_err(explain)?
            .enriched
            .context("ATR was not computed")?,
    };

    let projection = if args.lag {
        Projection::Previous
    } else {
        Projection::Containing
    };
    let enriched = project_onto(&fine, &coarse, config.target, projection);

    if !quiet {
        let covered = enriched.iter().filter(|e| e.has_atr()).count();
        eprintln!(
            "Projected {} ATR ({window}) onto {covered} of {} {} bars",
            config.target,
            enriched.len(),
            config.source
        );
    }

    write_rows(Rows::Enriched(&enriched), &args.output, quiet)
}
