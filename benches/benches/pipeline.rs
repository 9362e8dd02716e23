//! Classification and conversion throughput.
//!
//! Run with: cargo bench -p ecmatree-bench --bench pipeline

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ecmatree_syntax::{Options, Pipeline, TreeShape, classify};
use std::hint::black_box;

fn typescript_source(units: usize) -> String {
    (0..units)
        .map(|i| {
            format!(
                "export interface Config{i} {{ name: string; value: number; }}\n\
                 export function process{i}(config: Config{i}): string {{\n\
                 \x20   const result = config.name + String(config.value);\n\
                 \x20   return result.toUpperCase();\n\
                 }}\n"
            )
        })
        .collect()
}

fn javascript_source(units: usize) -> String {
    (0..units)
        .map(|i| {
            format!(
                "function compute{i}(a, b) {{\n\
                 \x20   return a + b * {i};\n\
                 }}\n\
                 module.exports.compute{i} = compute{i};\n"
            )
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    for units in [10, 100] {
        let typed = typescript_source(units);
        let plain = javascript_source(units);
        group.bench_with_input(BenchmarkId::new("typescript", units), &typed, |b, s| {
            b.iter(|| classify(black_box(s)))
        });
        group.bench_with_input(BenchmarkId::new("javascript", units), &plain, |b, s| {
            b.iter(|| classify(black_box(s)))
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let native = Pipeline::new(Options::default());
    let normalized = Pipeline::new(Options {
        plain_tree: TreeShape::Normalized,
        ..Options::default()
    });

    let mut group = c.benchmark_group("pipeline");
    for units in [10, 100] {
        let typed = typescript_source(units);
        let plain = javascript_source(units);
        group.bench_with_input(BenchmarkId::new("typescript", units), &typed, |b, s| {
            b.iter(|| serde_json::to_string(&native.run(black_box(s))))
        });
        group.bench_with_input(BenchmarkId::new("javascript_native", units), &plain, |b, s| {
            b.iter(|| serde_json::to_string(&native.run(black_box(s))))
        });
        group.bench_with_input(
            BenchmarkId::new("javascript_normalized", units),
            &plain,
            |b, s| b.iter(|| serde_json::to_string(&normalized.run(black_box(s)))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_pipeline);
criterion_main!(benches);
