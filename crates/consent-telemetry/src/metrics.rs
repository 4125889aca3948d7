//! Prometheus metrics for Consent-Sync subsystems.
//!
//! All metrics follow the naming convention: `cs_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CONSENT DECISIONS
    // =========================================================================

    /// Consent checks by resolution source
    pub static ref CONSENT_CHECKS: CounterVec = CounterVec::new(
        Opts::new("cs_consent_checks_total", "Consent checks by resolution source"),
        &["source"]  // source: local/cross-domain/none
    ).expect("metric creation failed");

    /// Consent saves by outcome
    pub static ref CONSENT_SAVES: CounterVec = CounterVec::new(
        Opts::new("cs_consent_saves_total", "Consent saves by outcome"),
        &["outcome"]  // outcome: synced/local_only
    ).expect("metric creation failed");

    /// Consent revocations by outcome
    pub static ref CONSENT_REVOKES: CounterVec = CounterVec::new(
        Opts::new("cs_consent_revokes_total", "Consent revocations by outcome"),
        &["outcome"]  // outcome: synced/local_only
    ).expect("metric creation failed");

    // =========================================================================
    // SYNCHRONIZATION
    // =========================================================================

    /// Remote store failures by operation
    pub static ref REMOTE_FAILURES: CounterVec = CounterVec::new(
        Opts::new("cs_remote_failures_total", "Remote consent store failures"),
        &["operation"]  // operation: check/save/revoke
    ).expect("metric creation failed");

    /// Newer decisions adopted from the remote store
    pub static ref SYNC_UPDATES: Counter = Counter::new(
        "cs_sync_updates_total",
        "Local records replaced by a newer remote decision"
    ).expect("metric creation failed");

    /// Local cache writes that did not persist
    pub static ref CACHE_WRITE_FAILURES: Counter = Counter::new(
        "cs_cache_write_failures_total",
        "Consent cache writes that failed to persist"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(CONSENT_CHECKS.clone()),
        Box::new(CONSENT_SAVES.clone()),
        Box::new(CONSENT_REVOKES.clone()),
        Box::new(REMOTE_FAILURES.clone()),
        Box::new(SYNC_UPDATES.clone()),
        Box::new(CACHE_WRITE_FAILURES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Count a consent check resolved from `source`.
pub fn record_check(source: &str) {
    CONSENT_CHECKS.with_label_values(&[source]).inc();
}

/// Count a save; `synced` is false when only the local write succeeded.
pub fn record_save(synced: bool) {
    let outcome = if synced { "synced" } else { "local_only" };
    CONSENT_SAVES.with_label_values(&[outcome]).inc();
}

/// Count a revoke; `synced` is false when only the local clear succeeded.
pub fn record_revoke(synced: bool) {
    let outcome = if synced { "synced" } else { "local_only" };
    CONSENT_REVOKES.with_label_values(&[outcome]).inc();
}

/// Count a failed call to the remote store.
pub fn record_remote_failure(operation: &str) {
    REMOTE_FAILURES.with_label_values(&[operation]).inc();
}
