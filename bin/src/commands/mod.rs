//! CLI command implementations.

pub(crate) mod aggregate;
pub(crate) mod atr;
pub(crate) mod check;
pub(crate) mod project;
pub(crate) mod run;

use crate::display::{InputArgs, explain, read_input};
use anyhow::Result;
use candela_lib::prelude::*;

/// Reads `input` and runs `config` over it, logging what the pipeline found.
pub(crate) fn run_pipeline(
    input: &InputArgs,
    config: PipelineConfig,
    quiet: bool,
) -> Result<PipelineOutput> {
    let options = input.read_options(config.order, config.source != config.target)?;
    let bars = read_input(input, &options, quiet)?;
    let output = Pipeline::new(config).run(&bars).map_err(explain)?;

    if !output.gaps.is_empty() {
        tracing::warn!(
            gaps = output.gaps.len(),
            missing = output.missing_buckets(),
            granularity = %output.granularity,
            "output has empty buckets"
        );
    }
    if output.duplicates_dropped > 0 {
        tracing::info!(dropped = output.duplicates_dropped, "dropped duplicate timestamps");
    }

    Ok(output)
}
