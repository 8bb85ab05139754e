//! Aggregation and ATR throughput over synthetic minute bars.
//!
//! Run with: `cargo bench --package candela-bench`

use candela_bench::synthetic_minutes;
use candela_lib::{
    AtrExt, AtrWindow, Granularity, Period, Pipeline, PipelineConfig, aggregate, compute_atr,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const DAYS: [usize; 3] = [1, 7, 30];

fn aggregate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for days in DAYS {
        let bars = synthetic_minutes(days, 42);
        group.throughput(Throughput::Elements(bars.len() as u64));

        for target in [Granularity::Hourly, Granularity::Daily] {
            group.bench_with_input(
                BenchmarkId::new(target.as_str(), format!("{days}d")),
                &bars,
                |b, bars| b.iter(|| aggregate(black_box(bars), target)),
            );
        }
    }

    group.finish();
}

fn atr_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("atr");
    let period = Period::WILDER;

    for days in DAYS {
        let bars = synthetic_minutes(days, 42);
        group.throughput(Throughput::Elements(bars.len() as u64));

        group.bench_with_input(BenchmarkId::new("batch", format!("{days}d")), &bars, |b, bars| {
            b.iter(|| compute_atr(black_box(bars), period));
        });
        group.bench_with_input(BenchmarkId::new("iter", format!("{days}d")), &bars, |b, bars| {
            b.iter(|| black_box(bars).iter().with_atr(period).filter(|e| e.has_atr()).count());
        });
    }

    group.finish();
}

fn pipeline_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let config = PipelineConfig::new().with_atr(AtrWindow::Days(14));
    let pipeline = Pipeline::new(config);

    for days in DAYS {
        let bars = synthetic_minutes(days, 7);
        group.throughput(Throughput::Elements(bars.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("minute-to-hourly", format!("{days}d")),
            &bars,
            |b, bars| b.iter(|| pipeline.run(black_box(bars))),
        );
    }

    group.finish();
}

criterion_group!(benches, aggregate_benchmark, atr_benchmark, pipeline_benchmark);
criterion_main!(benches);
