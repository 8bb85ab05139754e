//! Check command implementation.
//!
//! Reports ordering, duplicate timestamps, malformed bars and empty buckets
//! without changing the input.

use crate::display::{InputArgs, spinner};
use anyhow::{Context, Result, bail};
use candela_lib::prelude::*;
use candela_lib::{dedup, find_gaps};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Arguments for `candela check`.
#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub(crate) input: InputArgs,

    /// Granularity used for the gap scan
    #[arg(short, long)]
    pub(crate) granularity: Option<Granularity>,

    /// Maximum number of gaps to list (all are counted)
    #[arg(long, default_value = "20")]
    pub(crate) max_gaps: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,

    /// Exit with an error if any issue is found
    #[arg(long)]
    pub(crate) strict: bool,
}

/// Findings for one input.
#[derive(Debug, Serialize)]
struct CheckReport {
    bars: usize,
    granularity: Granularity,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
    /// Index of the first bar earlier than its predecessor.
    unsorted_at: Option<usize>,
    duplicates: usize,
    malformed: usize,
    missing_buckets: u64,
    gaps: Vec<Gap>,
}

impl CheckReport {
    fn build(mut bars: Vec<Bar>, granularity: Granularity, unsorted_at: Option<usize>) -> Self {
        if unsorted_at.is_some() {
            bars.sort_by_key(|b| b.timestamp);
        }
        let (_, duplicates) = dedup(&bars, DuplicatePolicy::KeepFirst);
        let gaps = find_gaps(&bars, granularity);

        Self {
            bars: bars.len(),
            granularity,
            first: bars.first().map(|b| b.timestamp),
            last: bars.last().map(|b| b.timestamp),
            unsorted_at,
            duplicates,
            malformed: bars.iter().filter(|b| !b.is_well_formed()).count(),
            missing_buckets: gaps.iter().map(|g| g.missing).sum(),
            gaps,
        }
    }

    const fn is_clean(&self) -> bool {
        self.unsorted_at.is_none()
            && self.duplicates == 0
            && self.malformed == 0
            && self.gaps.is_empty()
    }

    fn print(&self, max_gaps: usize) {
        let range =
            |t: Option<DateTime<Utc>>| t.map_or_else(|| "-".to_string(), |t| t.to_rfc3339());

        println!("Bars:        {}", self.bars);
        println!("First:       {}", range(self.first));
        println!("Last:        {}", range(self.last));
        match self.unsorted_at {
            Some(index) => println!("Order:       unsorted from bar {index}"),
            None => println!("Order:       ok"),
        }
        println!("Duplicates:  {}", self.duplicates);
        println!("Malformed:   {}", self.malformed);
        println!(
            "Gaps:        {} ({} empty {} buckets)",
            self.gaps.len(),
            self.missing_buckets,
            self.granularity
        );

        if !self.gaps.is_empty() {
            println!("\n{:<27} {:<27} {:>8}", "AFTER", "BEFORE", "MISSING");
            println!("{}", "-".repeat(64));
            for gap in self.gaps.iter().take(max_gaps) {
                println!(
                    "{:<27} {:<27} {:>8}",
                    gap.after.to_rfc3339(),
                    gap.before.to_rfc3339(),
                    gap.missing
                );
            }
            if self.gaps.len() > max_gaps {
                println!("... {} more", self.gaps.len() - max_gaps);
            }
        }
    }
}

fn read_raw(input: &Path) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    if input == Path::new("-") {
        std::io::stdin().lock().read_to_end(&mut raw)?;
    } else {
        raw = std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    }
    Ok(raw)
}

/// Check an input file and print a report.
pub(crate) fn check(args: &CheckArgs, config: PipelineConfig, quiet: bool) -> Result<()> {
    let granularity = args.granularity.unwrap_or(config.source);
    let progress = spinner(quiet, format!("Checking {}", args.input.input.display()))?;

    let raw = read_raw(&args.input.input)?;
    let options = args.input.read_options(OrderPolicy::Sort, false)?;
    let bars = read_bars(raw.as_slice(), &options)
        .with_context(|| format!("Failed to parse {}", args.input.input.display()))?;
    let unsorted_at = match read_bars(raw.as_slice(), &options.with_order(OrderPolicy::Strict)) {
        Err(CandelaError::UnsortedInput { index, .. }) => Some(index),
        _ => None,
    };
    progress.finish_and_clear();

    let report = CheckReport::build(bars, granularity, unsorted_at);
    tracing::debug!(?report, "check finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print(args.max_gaps);
    }

    if args.strict && !report.is_clean() {
        bail!("{} has issues", args.input.input.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_at(secs: i64) -> Bar {
        Bar::from_epoch(secs, 1.0, 2.0, 0.5, 1.5, 1.0).unwrap()
    }

    #[test]
    fn test_report_counts() {
        let mut bad = bar_at(7200);
        bad.low = 3.0;
        let bars = vec![bar_at(0), bar_at(0), bad, bar_at(5 * 3600)];

        let report = CheckReport::build(bars, Granularity::Hourly, None);
        assert_eq!(report.bars, 4);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.gaps.len(), 2);
        assert_eq!(report.missing_buckets, 3);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_nan_and_negative_volume_are_malformed() {
        let mut nan = bar_at(60);
        nan.close = f64::NAN;
        let mut negative = bar_at(120);
        negative.volume = -2.0;

        let report = CheckReport::build(vec![bar_at(0), nan, negative], Granularity::Minute, None);
        assert_eq!(report.malformed, 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_clean_report() {
        let bars: Vec<_> = (0..10).map(|i| bar_at(i * 60)).collect();
        let report = CheckReport::build(bars, Granularity::Minute, None);
        assert!(report.is_clean());
        assert_eq!(report.first.map(|t| t.timestamp()), Some(0));
        assert_eq!(report.last.map(|t| t.timestamp()), Some(540));
    }

    #[test]
    fn test_unsorted_report_is_sorted_before_scanning() {
        let bars = vec![bar_at(3600), bar_at(0)];
        let report = CheckReport::build(bars, Granularity::Hourly, Some(1));
        assert_eq!(report.first.map(|t| t.timestamp()), Some(0));
        assert!(report.gaps.is_empty());
        assert!(!report.is_clean());
    }
}
