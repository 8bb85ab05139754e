//! Benchmark utilities for candela.

use candela_lib::{Bar, CsvFormatter, Formatter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

/// Result of a single timed run.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Name of the measured step.
    pub step: String,
    /// Wall-clock duration.
    pub duration: Duration,
    /// Number of input bars.
    pub bars_in: u64,
    /// Number of output rows.
    pub bars_out: u64,
}

impl BenchmarkResult {
    /// Input bars processed per second.
    pub fn bars_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.bars_in as f64 / secs
        } else {
            0.0
        }
    }
}

/// Generates `days` of contiguous minute bars as a random walk around 100.
///
/// The same `seed` always yields the same bars.
pub fn synthetic_minutes(days: usize, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut close = 100.0_f64;

    (0..days * 1440)
        .filter_map(|i| {
            let open = close;
            close = (open + rng.gen_range(-0.1..0.1)).max(1.0);
            let high = open.max(close) + rng.gen_range(0.0..0.05);
            let low = open.min(close) - rng.gen_range(0.0..0.05);
            let volume = f64::from(rng.gen_range(0..=10_u32));
            Bar::from_epoch(i as i64 * 60, open, high, low, close, volume)
        })
        .collect()
}

/// Writes bars as CSV to `path`.
pub fn write_csv(bars: &[Bar], path: &Path) -> std::io::Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    CsvFormatter::new()
        .write_bars(bars, writer)
        .map_err(std::io::Error::other)
}

/// Format duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{:.1}ms", secs * 1000.0)
    } else {
        format!("{secs:.2}s")
    }
}

/// Format a rate for display.
pub fn format_rate(per_sec: f64) -> String {
    if per_sec >= 1_000_000.0 {
        format!("{:.1}M/s", per_sec / 1_000_000.0)
    } else {
        format!("{:.0}k/s", per_sec / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_minutes_is_seeded() {
        let first = synthetic_minutes(1, 42);
        assert_eq!(first.len(), 1440);
        assert_eq!(first, synthetic_minutes(1, 42));
        assert_ne!(first, synthetic_minutes(1, 43));
        assert!(first.iter().all(Bar::is_well_formed));
        assert_eq!(first[1].epoch_seconds(), 60);
    }
}
