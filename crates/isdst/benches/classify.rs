use std::hint::black_box;

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use isdst::{is_daylight_saving, FixedZone, IanaProvider, ZoneProvider};

fn bench_classify(c: &mut Criterion) {
    let instant = Utc.timestamp_opt(1_221_681_866, 0).single().unwrap();
    let la = IanaProvider.resolve("America/Los_Angeles").unwrap();
    let sydney = IanaProvider.resolve("Australia/Sydney").unwrap();
    let utc = FixedZone::utc();

    let mut group = c.benchmark_group("is_daylight_saving");
    group.bench_function("america_los_angeles", |b| {
        b.iter(|| is_daylight_saving(black_box(instant), &la))
    });
    group.bench_function("australia_sydney", |b| {
        b.iter(|| is_daylight_saving(black_box(instant), &sydney))
    });
    group.bench_function("fixed_utc", |b| {
        b.iter(|| is_daylight_saving(black_box(instant), &utc))
    });
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("iana_provider_resolve", |b| {
        b.iter(|| IanaProvider.resolve(black_box("Europe/Berlin")))
    });
}

criterion_group!(benches, bench_classify, bench_resolve);
criterion_main!(benches);
