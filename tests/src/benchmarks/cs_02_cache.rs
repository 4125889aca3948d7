//! # CS-02 Local Cache Benchmarks
//!
//! The cache is read synchronously before any consent-gated script runs.
//! Measures in-memory and file-backed storage.

use std::sync::Arc;

use criterion::{black_box, Criterion};
use cs_02_local_cache::{FileStorage, InMemoryStorage, KeyValueStorage, LocalConsentCache};
use shared_types::{ConsentPreferences, ConsentRecord};

const NOW: u64 = 1_700_000_000_000;

fn record(timestamp: u64) -> ConsentRecord {
    ConsentRecord::new(
        ConsentPreferences::new(true, true, false),
        timestamp,
        "bench.example",
        "bench-org",
        "2024-01",
    )
}

fn bench_cache(c: &mut Criterion, name: &str, storage: Arc<dyn KeyValueStorage>) {
    let cache = LocalConsentCache::new(storage);
    cache.write(&record(NOW));

    let mut group = c.benchmark_group(format!("cs-02-{name}"));
    group.bench_function("read_valid", |b| {
        b.iter(|| black_box(cache.read_valid(black_box(NOW))))
    });

    let mut ts = NOW;
    group.bench_function("write", |b| {
        b.iter(|| {
            ts += 1;
            black_box(cache.write(&record(ts)))
        })
    });
    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_cache(c, "memory", Arc::new(InMemoryStorage::new()));

    let dir = std::env::temp_dir().join(format!("cs-bench-{}", std::process::id()));
    if let Ok(storage) = FileStorage::in_dir(&dir) {
        bench_cache(c, "file", Arc::new(storage));
    }
    let _ = std::fs::remove_dir_all(&dir);
}
