//! # User-Visible Scenarios
//!
//! First visit, returning visitor, "Reject All", and decisions travelling
//! between domains of the same group.

use std::sync::Arc;

use consent_runtime::{ConsentRuntime, RuntimeConfig};
use cs_01_jurisdiction_policy::PrivacySignals;
use cs_02_local_cache::{InMemoryStorage, LocalConsentCache};
use cs_03_cross_domain_sync::{
    ConsentSource, CrossDomainSyncApi, CrossDomainSyncClient, HttpRemoteConsentStore,
    MockRemoteStore, SyncOutcome,
};
use cs_04_consent_controller::{ConsentStateApi, DecisionState};
use serde_json::json;
use shared_bus::{ChangeOrigin, EventFilter, EventTopic, InMemoryEventBus};
use shared_types::{ConsentCategory, ConsentPreferences, ManualClock, DAY_MS};

use super::fake_store::FakeConsentStore;
use super::fixtures::{open_tab, record_at, sync_config, wait_until, DOMAIN_A, DOMAIN_B, NOW};

// =============================================================================
// FIRST VISIT
// =============================================================================

#[tokio::test]
async fn test_fresh_browser_remote_not_found_shows_banner() {
    let store = FakeConsentStore::spawn(vec![DOMAIN_A.to_string()]).await.unwrap();
    let config = cs_03_cross_domain_sync::SyncConfig {
        endpoint: store.endpoint(),
        ..sync_config(DOMAIN_A)
    };
    let client = CrossDomainSyncClient::new(
        config.clone(),
        LocalConsentCache::new(Arc::new(InMemoryStorage::new())),
        Arc::new(HttpRemoteConsentStore::new(&config).unwrap()),
        Arc::new(InMemoryEventBus::new()),
        Arc::new(ManualClock::new(NOW)),
    );

    let check = client.check_consent().await;
    assert!(!check.has_consent);
    assert!(check.show_banner);
    assert_eq!(store.requests(), 1);

    let json = serde_json::to_value(&check).unwrap();
    assert_eq!(json["hasConsent"], json!(false));
    assert_eq!(json["showBanner"], json!(true));
}

#[tokio::test]
async fn test_fresh_browser_controller_shows_banner_with_defaults() {
    let remote = Arc::new(MockRemoteStore::new());
    let tab = open_tab(
        &InMemoryStorage::new(),
        Some(Arc::clone(&remote)),
        Arc::new(ManualClock::new(NOW)),
        DOMAIN_A,
        PrivacySignals::none(),
    );

    let snapshot = tab.controller.initialize().await;
    assert_eq!(snapshot.decision, DecisionState::FirstVisit);
    assert!(snapshot.show_banner());
    assert_eq!(snapshot.preferences, tab.controller.policy().default_preferences);
    assert_eq!(remote.check_calls(), 1);
}

// =============================================================================
// RETURNING VISITOR
// =============================================================================

#[tokio::test]
async fn test_cached_decision_is_returned_as_local() {
    let remote = Arc::new(MockRemoteStore::new());
    let origin = InMemoryStorage::new();
    let tab = open_tab(
        &origin,
        Some(Arc::clone(&remote)),
        Arc::new(ManualClock::new(NOW)),
        DOMAIN_A,
        PrivacySignals::none(),
    );
    let cached = ConsentPreferences::new(true, false, false);
    tab.cache.write(&record_at(cached, NOW - DAY_MS, DOMAIN_A));

    let check = tab.sync().check_consent().await;
    assert!(check.has_consent);
    assert!(!check.show_banner);
    assert_eq!(check.preferences, Some(cached));
    assert_eq!(check.source, Some(ConsentSource::Local));
    assert_eq!(remote.check_calls(), 0);

    let json = serde_json::to_value(&check).unwrap();
    assert_eq!(
        json["preferences"],
        json!({"necessary": true, "preferences": true, "analytics": false, "marketing": false})
    );
    assert_eq!(json["source"], json!("local"));

    let snapshot = tab.controller.initialize().await;
    assert_eq!(snapshot.preferences, cached);
    assert_eq!(snapshot.timestamp, Some(NOW - DAY_MS));
    assert!(!tab.controller.should_show_banner());
}

// =============================================================================
// REJECT ALL
// =============================================================================

#[tokio::test]
async fn test_reject_all_records_only_necessary_and_decides() {
    let remote = Arc::new(MockRemoteStore::new());
    let tab = open_tab(
        &InMemoryStorage::new(),
        Some(Arc::clone(&remote)),
        Arc::new(ManualClock::new(NOW)),
        DOMAIN_A,
        PrivacySignals::none().in_region("DE"),
    );
    assert!(!tab.controller.initialize().await.decision.is_decided());

    let snapshot = tab.controller.reject_all().await;
    assert!(snapshot.decision.is_decided());
    assert!(!snapshot.show_banner());

    let record = tab.cache.read().unwrap();
    assert_eq!(
        serde_json::to_value(record.preferences).unwrap(),
        json!({"necessary": true, "preferences": false, "analytics": false, "marketing": false})
    );
    assert_eq!(record.timestamp, NOW);
    assert_eq!(remote.record().map(|r| r.preferences), Some(record.preferences));

    for category in ConsentCategory::OPTIONAL {
        assert!(!tab.controller.has_consent_for(category));
    }
}

// =============================================================================
// ACROSS DOMAINS
// =============================================================================

#[tokio::test]
async fn test_decision_on_one_domain_is_found_on_another() {
    let remote = Arc::new(MockRemoteStore::new());
    let clock = Arc::new(ManualClock::new(NOW));
    let site_a = open_tab(
        &InMemoryStorage::new(),
        Some(Arc::clone(&remote)),
        clock.clone(),
        DOMAIN_A,
        PrivacySignals::none(),
    );
    site_a.controller.initialize().await;
    site_a.controller.accept_all().await;

    clock.advance(DAY_MS);
    let site_b = open_tab(
        &InMemoryStorage::new(),
        Some(Arc::clone(&remote)),
        clock,
        DOMAIN_B,
        PrivacySignals::none(),
    );
    let snapshot = site_b.controller.initialize().await;

    assert_eq!(snapshot.decision, DecisionState::Decided);
    assert_eq!(snapshot.source, Some(ConsentSource::CrossDomain));
    assert_eq!(snapshot.preferences, ConsentPreferences::accept_all());
    // Written through to B's own cache
    assert_eq!(
        site_b.cache.read().map(|r| r.domain),
        Some(DOMAIN_A.to_string())
    );
}

#[tokio::test]
async fn test_decision_outside_group_is_ignored() {
    let remote = Arc::new(MockRemoteStore::with_record(record_at(
        ConsentPreferences::accept_all(),
        NOW,
        "unrelated.example",
    )));
    let site = open_tab(
        &InMemoryStorage::new(),
        Some(remote),
        Arc::new(ManualClock::new(NOW)),
        DOMAIN_A,
        PrivacySignals::none(),
    );

    assert_eq!(
        site.controller.initialize().await.decision,
        DecisionState::FirstVisit
    );
}

#[tokio::test]
async fn test_sync_brings_newer_decision_into_running_tab() {
    let remote = Arc::new(MockRemoteStore::new());
    let clock = Arc::new(ManualClock::new(NOW));
    let site_a = open_tab(
        &InMemoryStorage::new(),
        Some(Arc::clone(&remote)),
        clock.clone(),
        DOMAIN_A,
        PrivacySignals::none(),
    );
    let site_b = open_tab(
        &InMemoryStorage::new(),
        Some(Arc::clone(&remote)),
        clock.clone(),
        DOMAIN_B,
        PrivacySignals::none(),
    );

    site_a.controller.initialize().await;
    site_a.controller.accept_all().await;
    site_b.controller.initialize().await;
    let listener = Arc::clone(&site_b.controller).start().unwrap();
    let mut updates = site_b
        .bus
        .subscribe(EventFilter::topics(vec![EventTopic::Updated]));

    clock.advance(60_000);
    site_a.controller.reject_all().await;

    match site_b.sync().sync_consent().await {
        SyncOutcome::Updated(record) => {
            assert_eq!(record.preferences, ConsentPreferences::reject_all())
        }
        other => panic!("expected an update, got {other:?}"),
    }
    let event = updates.recv().await.unwrap();
    assert_eq!(event.origin(), ChangeOrigin::CrossDomain);

    wait_until("site B to adopt the newer decision", || {
        site_b.controller.preferences() == ConsentPreferences::reject_all()
    })
    .await;
    assert_eq!(
        site_b.controller.snapshot().source,
        Some(ConsentSource::CrossDomain)
    );

    // Nothing newer: the next pass is a no-op
    assert_eq!(site_b.sync().sync_consent().await, SyncOutcome::Unchanged);
    listener.stop().await;
}

#[tokio::test]
async fn test_review_reopens_banner_once_with_previous_choices() {
    let origin = InMemoryStorage::new();
    let clock = Arc::new(ManualClock::new(NOW));
    let tab = open_tab(&origin, None, clock.clone(), DOMAIN_A, PrivacySignals::none());
    tab.controller.initialize().await;
    let chosen = ConsentPreferences::new(true, true, false);
    tab.controller.save_selection(chosen).await;

    let snapshot = tab.controller.request_review();
    assert_eq!(snapshot.decision, DecisionState::ReviewRequested);
    assert!(snapshot.show_banner());

    // Reload: banner shown, pre-filled
    let reload = open_tab(&origin, None, clock.clone(), DOMAIN_A, PrivacySignals::none());
    let snapshot = reload.controller.initialize().await;
    assert_eq!(snapshot.decision, DecisionState::ReviewRequested);
    assert_eq!(snapshot.preferences, chosen);

    // The flag is consumed; the next reload is decided again
    let again = open_tab(&origin, None, clock, DOMAIN_A, PrivacySignals::none());
    assert_eq!(
        again.controller.initialize().await.decision,
        DecisionState::Decided
    );
}

// =============================================================================
// RUNTIME
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_runtime_periodic_sync_adopts_remote_decision() {
    let remote = Arc::new(MockRemoteStore::new());
    let config = RuntimeConfig {
        sync: sync_config(DOMAIN_A),
        remote_sync_enabled: true,
        ..RuntimeConfig::default()
    };
    let runtime = ConsentRuntime::assemble(
        &config,
        Arc::new(InMemoryStorage::new()),
        Some(Arc::clone(&remote)),
        Arc::new(ManualClock::new(NOW)),
    );

    runtime.start().await.unwrap();
    assert_eq!(runtime.controller().decision(), DecisionState::FirstVisit);

    // Another domain decides; the next tick picks it up
    remote.set_record(Some(record_at(
        ConsentPreferences::new(false, true, false),
        NOW,
        DOMAIN_B,
    )));
    tokio::time::sleep(config.sync.sync_interval()).await;

    wait_until("the periodic pass to update the controller", || {
        runtime.controller().decision() == DecisionState::Decided
    })
    .await;
    assert!(runtime
        .controller()
        .has_consent_for(ConsentCategory::Analytics));
    assert!(remote.check_calls() >= 2);

    runtime.shutdown().await;
    assert!(!runtime.is_running());
}

#[tokio::test]
async fn test_failed_remote_save_is_counted() {
    consent_telemetry::register_metrics().unwrap();
    let remote = Arc::new(MockRemoteStore::new());
    remote.set_failing(true);
    let tab = open_tab(
        &InMemoryStorage::new(),
        Some(remote),
        Arc::new(ManualClock::new(NOW)),
        DOMAIN_A,
        PrivacySignals::none(),
    );
    let before = consent_telemetry::metrics::REMOTE_FAILURES
        .with_label_values(&["save"])
        .get();

    tab.controller.accept_all().await;

    let after = consent_telemetry::metrics::REMOTE_FAILURES
        .with_label_values(&["save"])
        .get();
    assert!(after >= before + 1.0);
    let text = consent_telemetry::gather_metrics().unwrap();
    assert!(text.contains("cs_remote_failures_total"));
    assert!(text.contains("cs_consent_saves_total"));
}
