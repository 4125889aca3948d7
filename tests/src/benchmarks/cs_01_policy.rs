//! # CS-01 Jurisdiction Policy Benchmarks
//!
//! Detection and table lookup run once per session and must stay far below
//! a frame budget.

use criterion::{black_box, BenchmarkId, Criterion};
use cs_01_jurisdiction_policy::{detect_jurisdiction, get_jurisdiction_config, PrivacySignals};
use shared_types::Jurisdiction;

const REGIONS: [&str; 6] = ["DE", "GB", "IN", "US-CA", "US-NY", "BR"];

pub fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("cs-01-detection");

    group.bench_function("gpc_signal", |b| {
        let signals = PrivacySignals::with_gpc();
        b.iter(|| black_box(detect_jurisdiction(black_box(&signals))))
    });

    for region in REGIONS {
        let signals = PrivacySignals::none().in_region(region);
        group.bench_with_input(BenchmarkId::new("region", region), &signals, |b, signals| {
            b.iter(|| black_box(detect_jurisdiction(black_box(signals))))
        });
    }

    group.finish();
}

pub fn bench_lookup(c: &mut Criterion) {
    c.bench_function("cs-01-lookup-all", |b| {
        b.iter(|| {
            for j in [
                Jurisdiction::Gdpr,
                Jurisdiction::Ccpa,
                Jurisdiction::Dpdp,
                Jurisdiction::Default,
            ] {
                black_box(get_jurisdiction_config(Some(j)).default_preferences);
            }
        })
    });
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_detection(c);
    bench_lookup(c);
}
