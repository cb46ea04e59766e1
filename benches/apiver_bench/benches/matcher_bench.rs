//! Endpoint matching benchmarks
//!
//! Measures per-request resolution cost for common request shapes.

use apiver_core::{
    ApiVersion, ConventionBuilder, RawRequest, VersionMatcherPolicy, VersionedEndpoint,
    VersioningOptions,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn candidates() -> Vec<VersionedEndpoint> {
    let mut conventions = ConventionBuilder::new();
    for major in 1..=5u32 {
        conventions
            .group(format!("Orders{}Controller", major))
            .declare_version(ApiVersion::new(major, 0))
            .declare_version(ApiVersion::new(major, 1));
    }
    let Ok(table) = conventions.build() else {
        return Vec::new();
    };
    (1..=5u32)
        .filter_map(|major| table.endpoint(&format!("Orders{}Controller", major), "Get"))
        .collect()
}

/// Benchmark request resolution
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let candidates = candidates();

    let policy = VersionMatcherPolicy::new(VersioningOptions::new().headers(["x-api-version"]));
    let query = RawRequest::new("/orders").query("api-version", "3.1");
    group.bench_function("query_match", |b| {
        b.iter(|| policy.resolve(black_box(&query), &candidates))
    });

    let ambiguous = RawRequest::new("/orders")
        .query("api-version", "3.1")
        .header("x-api-version", "2.0");
    group.bench_function("ambiguous", |b| {
        b.iter(|| policy.resolve(black_box(&ambiguous), &candidates))
    });

    let unsupported = RawRequest::new("/orders").query("api-version", "9.0");
    group.bench_function("unsupported", |b| {
        b.iter(|| policy.resolve(black_box(&unsupported), &candidates))
    });

    let segment = VersionMatcherPolicy::new(
        VersioningOptions::new().url_segment_template("api/v{version}/orders"),
    );
    let path = RawRequest::new("/api/v4.0/orders");
    group.bench_function("url_segment", |b| {
        b.iter(|| segment.resolve(black_box(&path), &candidates))
    });

    let defaulted = VersionMatcherPolicy::new(
        VersioningOptions::new().assume_default_version(ApiVersion::new(1, 0)),
    );
    let bare = RawRequest::new("/orders");
    group.bench_function("assumed_default", |b| {
        b.iter(|| defaulted.resolve(black_box(&bare), &candidates))
    });

    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
