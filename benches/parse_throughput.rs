//! Parse throughput benchmark.
//!
//! Measures bytes/sec for numeric-heavy and string-heavy inputs, and the
//! cost of starting from a tiny initial capacity versus a right-sized one.
//!
//! Run: cargo bench --bench parse_throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tip::{parse_with, ColumnType, ParseOptions};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn numeric_input(rows: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(rows * 32);
    for i in 0..rows {
        out.extend_from_slice(format!("{},{}.{},{}\n", i, i % 977, i % 100, -(i as i64)).as_bytes());
    }
    out
}

fn string_input(rows: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(rows * 48);
    for i in 0..rows {
        out.extend_from_slice(
            format!("{},func_{},src/module_{}/file_{}.js\n", i, i, i % 40, i % 1000).as_bytes(),
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_numeric(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_numeric");
    let types = vec![ColumnType::Integer, ColumnType::Float, ColumnType::Integer];

    for rows in [10_000, 100_000, 1_000_000] {
        let input = numeric_input(rows);
        let opts = ParseOptions::new(types.clone());
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &input, |b, input| {
            b.iter(|| {
                let parsed = parse_with(black_box(input), &opts).unwrap();
                black_box(parsed.record_count)
            });
        });
    }

    group.finish();
}

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_strings");
    let types = vec![ColumnType::Integer, ColumnType::String, ColumnType::String];

    for rows in [10_000, 100_000, 1_000_000] {
        let input = string_input(rows);
        let opts = ParseOptions::new(types.clone());
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &input, |b, input| {
            b.iter(|| {
                let parsed = parse_with(black_box(input), &opts).unwrap();
                black_box(parsed.record_count)
            });
        });
    }

    group.finish();
}

fn bench_initial_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_capacity");
    let rows = 500_000;
    let input = string_input(rows);
    let types = vec![ColumnType::Integer, ColumnType::String, ColumnType::String];
    group.throughput(Throughput::Bytes(input.len() as u64));

    for (label, initial) in [("tiny", Some(16)), ("estimated", None), ("exact", Some(rows))] {
        let mut opts = ParseOptions::new(types.clone());
        opts.initial_rows = initial;
        group.bench_function(label, |b| {
            b.iter(|| {
                let parsed = parse_with(black_box(&input), &opts).unwrap();
                black_box(parsed.stats.row_growths)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_numeric, bench_strings, bench_initial_capacity);
criterion_main!(benches);
