//! Version parsing and ordering benchmarks

use apiver_core::{ApiVersion, VersionFormat};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Benchmark parsing version strings
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("major_minor", |b| {
        b.iter(|| ApiVersion::parse(black_box("2.1")))
    });

    group.bench_function("with_status", |b| {
        b.iter(|| ApiVersion::parse(black_box("2.1-beta.3")))
    });

    group.bench_function("invalid", |b| {
        b.iter(|| ApiVersion::parse(black_box("two-point-one")))
    });

    group.finish();
}

/// Benchmark formatting and sorting
fn bench_format_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");

    let version = ApiVersion::new(2, 1).with_status("beta").unwrap_or_default();
    group.bench_function("canonical", |b| b.iter(|| black_box(&version).to_string()));
    group.bench_function("pattern", |b| {
        b.iter(|| black_box(&version).format(VersionFormat::Pattern("v{major}.{minor}{status}")))
    });

    let versions: Vec<ApiVersion> = (0..100u32)
        .rev()
        .map(|i| {
            let version = ApiVersion::new(i % 5, i % 7);
            if i % 3 == 0 {
                version.with_status("Beta").unwrap_or_default()
            } else {
                version
            }
        })
        .collect();
    group.bench_function("sort_100", |b| {
        b.iter(|| {
            let mut sorted = black_box(versions.clone());
            sorted.sort();
            sorted
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_format_and_sort);
criterion_main!(benches);
