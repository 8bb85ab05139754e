//! Benchmark runner that outputs a markdown table for the README.
//!
//! Run with: `cargo run --package candela-bench --bin benchmark_table --release`
//!
//! Times each stage of a CSV-to-CSV run over synthetic minute bars.

use candela_bench::{BenchmarkResult, format_duration, format_rate, synthetic_minutes, write_csv};
use candela_lib::{
    AtrWindow, CsvFormatter, Formatter, Pipeline, PipelineConfig, ReadOptions, read_bars_from_path,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::{Duration, Instant};

/// Number of iterations per benchmark for statistical significance.
const ITERATIONS: u32 = 3;

fn time<T>(mut f: impl FnMut() -> T) -> (T, Duration) {
    let mut total = Duration::ZERO;
    let mut out = f();
    for _ in 1..ITERATIONS {
        let start = Instant::now();
        out = f();
        total += start.elapsed();
    }
    (out, total / (ITERATIONS - 1).max(1))
}

fn run(days: usize) -> std::io::Result<Vec<BenchmarkResult>> {
    let dir = tempfile::TempDir::new()?;
    let input = dir.path().join("minutes.csv");
    let output = dir.path().join("hourly.csv");
    write_csv(&synthetic_minutes(days, 42), &input)?;

    let (bars, read) = time(|| read_bars_from_path(&input, &ReadOptions::new()));
    let bars = bars.map_err(std::io::Error::other)?;

    let pipeline = Pipeline::new(PipelineConfig::new().with_atr(AtrWindow::Days(14)));
    let (result, compute) = time(|| pipeline.run(&bars));
    let enriched = result
        .map_err(std::io::Error::other)?
        .enriched
        .unwrap_or_default();

    let (written, write) = time(|| {
        File::create(&output).map(BufWriter::new).and_then(|w| {
            CsvFormatter::new()
                .write_enriched(&enriched, w)
                .map_err(std::io::Error::other)
        })
    });
    written?;

    let bars_in = bars.len() as u64;
    let bars_out = enriched.len() as u64;
    Ok(vec![
        BenchmarkResult {
            step: "read".to_string(),
            duration: read,
            bars_in,
            bars_out: bars_in,
        },
        BenchmarkResult {
            step: "aggregate + atr".to_string(),
            duration: compute,
            bars_in,
            bars_out,
        },
        BenchmarkResult {
            step: "write".to_string(),
            duration: write,
            bars_in,
            bars_out,
        },
    ])
}

fn main() {
    println!("candela pipeline benchmark");
    println!("==========================\n");
    println!("Running benchmarks ({ITERATIONS} iterations each)...\n");

    println!("| Data Range | Step | Bars In | Rows Out | Time | Rate |");
    println!("|------------|------|---------|----------|------|------|");

    for days in [1, 7, 30] {
        match run(days) {
            Ok(results) => {
                for r in &results {
                    println!(
                        "| {days} days | {} | {} | {} | {} | {} |",
                        r.step,
                        r.bars_in,
                        r.bars_out,
                        format_duration(r.duration),
                        format_rate(r.bars_per_sec())
                    );
                }
            }
            Err(err) => {
                eprintln!("Error benchmarking {days} days: {err}");
                std::process::exit(1);
            }
        }
        let _ = std::io::stdout().flush();
    }
}
