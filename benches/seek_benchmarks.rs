//! Seek throughput over an indexed in-memory trace.
//!
//! Measures the payoff of the checkpoint index: random seeks by rank and by
//! timestamp should cost one binary search plus at most `cache_size` linear
//! parses, independent of trace length.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sediment::prelude::*;
use sediment::Trace;

const TRACE_LEN: usize = 100_000;
const STEP_NS: i64 = 10;

fn indexed_trace(cache_size: usize) -> Trace<MemoryParser> {
    let trace = TraceBuilder::new()
        .cache_size(cache_size)
        .build(MemoryParser::generate(TRACE_LEN, 0, STEP_NS))
        .unwrap();
    trace.build_index(0, TimeRange::ETERNITY).unwrap();
    trace
}

fn bench_seek_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("seek_rank");
    for cache_size in [100, 1_000, 10_000] {
        let trace = indexed_trace(cache_size);
        let mut rng = StdRng::seed_from_u64(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(cache_size),
            &cache_size,
            |b, _| {
                b.iter(|| {
                    let rank = rng.gen_range(0..TRACE_LEN as u64);
                    let ctx = trace.seek_rank(black_box(rank)).unwrap();
                    black_box(ctx.rank())
                })
            },
        );
    }
    group.finish();
}

fn bench_seek_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("seek_time");
    for cache_size in [100, 1_000, 10_000] {
        let trace = indexed_trace(cache_size);
        let mut rng = StdRng::seed_from_u64(7);
        group.bench_with_input(
            BenchmarkId::from_parameter(cache_size),
            &cache_size,
            |b, _| {
                b.iter(|| {
                    let target = rng.gen_range(0..TRACE_LEN as i64 * STEP_NS);
                    let ctx = trace
                        .seek_time(black_box(Some(Timestamp::from_nanos(target))))
                        .unwrap();
                    black_box(ctx.rank())
                })
            },
        );
    }
    group.finish();
}

fn bench_sequential_read(c: &mut Criterion) {
    let trace = indexed_trace(1_000);
    c.bench_function("read_10k_events", |b| {
        b.iter(|| {
            let mut ctx = trace.seek_rank(0).unwrap();
            let mut count = 0u64;
            while count < 10_000 {
                if trace.get_next(&mut ctx).unwrap().is_none() {
                    break;
                }
                count += 1;
            }
            black_box(count)
        })
    });
}

criterion_group!(benches, bench_seek_rank, bench_seek_time, bench_sequential_read);
criterion_main!(benches);
