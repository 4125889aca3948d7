//! # Consent Properties
//!
//! Invariants that must hold across subsystems:
//!
//! | Property | Statement |
//! |----------|-----------|
//! | Necessary always granted | Every preferences value has `necessary == true` |
//! | Validity boundary | Records expire exactly 365 days after their timestamp |
//! | Local-first durability | A save is in the local cache even if the remote save fails |
//! | Idempotent revoke | Revoking twice leaves the cache empty and never fails |
//! | Jurisdiction default | GPC ⇒ `CCPA`, nothing ⇒ `DEFAULT` |
//! | Cross-tab convergence | Another tab's save reaches this tab without a reload |

use std::sync::Arc;

use cs_01_jurisdiction_policy::{detect_jurisdiction, PrivacySignals};
use cs_02_local_cache::InMemoryStorage;
use cs_03_cross_domain_sync::{ConsentSource, CrossDomainSyncApi, MockRemoteStore};
use cs_04_consent_controller::{ConsentStateApi, DecisionState};
use proptest::prelude::*;
use shared_bus::{ChangeOrigin, EventFilter, EventTopic};
use shared_types::{
    ConsentCategory, ConsentPreferences, Jurisdiction, ManualClock, PreferencesUpdate,
    CONSENT_VALIDITY_MS, DAY_MS,
};

use super::fixtures::{open_tab, record_at, wait_until, DOMAIN_A, NOW};

// =============================================================================
// NECESSARY ALWAYS GRANTED
// =============================================================================

#[derive(Debug, Clone)]
enum Action {
    Set(ConsentCategory, bool),
    Save(ConsentPreferences),
    AcceptAll,
    RejectAll,
    Revoke,
    Review,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0usize..ConsentCategory::ALL.len(), any::<bool>())
            .prop_map(|(i, granted)| Action::Set(ConsentCategory::ALL[i], granted)),
        (any::<bool>(), any::<bool>(), any::<bool>())
            .prop_map(|(p, a, m)| Action::Save(ConsentPreferences::new(p, a, m))),
        Just(Action::AcceptAll),
        Just(Action::RejectAll),
        Just(Action::Revoke),
        Just(Action::Review),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_necessary_granted_on_every_path(
        actions in proptest::collection::vec(action(), 1..12),
        gpc in any::<bool>(),
        remote_up in any::<bool>(),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let origin = InMemoryStorage::new();
            let clock = Arc::new(ManualClock::new(NOW));
            let remote = Arc::new(MockRemoteStore::new());
            remote.set_failing(!remote_up);
            let signals = if gpc { PrivacySignals::with_gpc() } else { PrivacySignals::none() };
            let tab = open_tab(&origin, Some(remote), clock.clone(), DOMAIN_A, signals);

            let snapshot = tab.controller.initialize().await;
            assert!(snapshot.preferences.necessary());

            for action in actions {
                clock.advance(1_000);
                match action {
                    Action::Set(category, granted) => {
                        tab.controller.set_consent(PreferencesUpdate::set(category, granted)).await;
                    }
                    Action::Save(prefs) => {
                        tab.controller.save_selection(prefs).await;
                    }
                    Action::AcceptAll => {
                        tab.controller.accept_all().await;
                    }
                    Action::RejectAll => {
                        tab.controller.reject_all().await;
                    }
                    Action::Revoke => {
                        tab.controller.revoke().await;
                    }
                    Action::Review => {
                        tab.controller.request_review();
                    }
                }

                let prefs = tab.controller.preferences();
                assert!(prefs.necessary());
                assert!(tab.controller.has_consent_for(ConsentCategory::Necessary));
                if let Some(record) = tab.cache.read() {
                    assert!(record.preferences.necessary());
                    let json = serde_json::to_value(record.preferences).unwrap();
                    assert_eq!(json["necessary"], serde_json::Value::Bool(true));
                }
            }
        });
    }
}

#[test]
fn test_necessary_false_from_the_wire_is_ignored() {
    let prefs: ConsentPreferences = serde_json::from_str(
        r#"{"necessary":false,"preferences":false,"analytics":true,"marketing":false}"#,
    )
    .unwrap();
    assert!(prefs.necessary());
    assert!(prefs.allows(ConsentCategory::Necessary));
    assert!(prefs.analytics);
}

// =============================================================================
// VALIDITY BOUNDARY
// =============================================================================

#[tokio::test]
async fn test_record_just_past_one_year_is_absent() {
    let origin = InMemoryStorage::new();
    let remote = Arc::new(MockRemoteStore::new());
    let tab = open_tab(
        &origin,
        Some(remote),
        Arc::new(ManualClock::new(NOW)),
        DOMAIN_A,
        PrivacySignals::none(),
    );
    tab.cache.write(&record_at(
        ConsentPreferences::accept_all(),
        NOW - CONSENT_VALIDITY_MS - 1,
        DOMAIN_A,
    ));

    let check = tab.sync().check_consent().await;
    assert!(!check.has_consent);
    assert!(check.show_banner);
}

#[tokio::test]
async fn test_record_just_inside_one_year_is_valid() {
    let origin = InMemoryStorage::new();
    let remote = Arc::new(MockRemoteStore::new());
    let tab = open_tab(
        &origin,
        Some(Arc::clone(&remote)),
        Arc::new(ManualClock::new(NOW)),
        DOMAIN_A,
        PrivacySignals::none(),
    );
    tab.cache.write(&record_at(
        ConsentPreferences::accept_all(),
        NOW - CONSENT_VALIDITY_MS + 1,
        DOMAIN_A,
    ));

    let check = tab.sync().check_consent().await;
    assert!(check.has_consent);
    assert_eq!(check.source, Some(ConsentSource::Local));
    assert_eq!(remote.check_calls(), 0);
}

#[tokio::test]
async fn test_expired_remote_record_is_absent_too() {
    let origin = InMemoryStorage::new();
    let remote = Arc::new(MockRemoteStore::with_record(record_at(
        ConsentPreferences::accept_all(),
        NOW - 366 * DAY_MS,
        DOMAIN_A,
    )));
    let tab = open_tab(
        &origin,
        Some(remote),
        Arc::new(ManualClock::new(NOW)),
        DOMAIN_A,
        PrivacySignals::none(),
    );

    let snapshot = tab.controller.initialize().await;
    assert_eq!(snapshot.decision, DecisionState::FirstVisit);
    assert!(tab.cache.read().is_none());
}

// =============================================================================
// LOCAL-FIRST DURABILITY
// =============================================================================

#[tokio::test]
async fn test_save_is_local_even_when_remote_fails() {
    let origin = InMemoryStorage::new();
    let remote = Arc::new(MockRemoteStore::new());
    remote.set_failing(true);
    let tab = open_tab(
        &origin,
        Some(Arc::clone(&remote)),
        Arc::new(ManualClock::new(NOW)),
        DOMAIN_A,
        PrivacySignals::none(),
    );
    let prefs = ConsentPreferences::new(false, true, false);

    let outcome = tab.sync().save_consent(prefs).await;
    assert!(!outcome.success);
    assert!(outcome.persisted_locally);
    assert_eq!(tab.cache.read().map(|r| r.preferences), Some(prefs));
    assert_eq!(remote.save_calls(), 1);
    assert!(remote.record().is_none());

    // A fresh tab on the same origin sees it without the network
    let reload = open_tab(
        &origin,
        Some(remote),
        Arc::new(ManualClock::new(NOW + 1)),
        DOMAIN_A,
        PrivacySignals::none(),
    );
    let snapshot = reload.controller.initialize().await;
    assert_eq!(snapshot.preferences, prefs);
    assert_eq!(snapshot.source, Some(ConsentSource::Local));
}

// =============================================================================
// IDEMPOTENT REVOKE
// =============================================================================

#[tokio::test]
async fn test_revoke_twice_leaves_cache_empty() {
    for remote_up in [true, false] {
        let origin = InMemoryStorage::new();
        let remote = Arc::new(MockRemoteStore::new());
        let tab = open_tab(
            &origin,
            Some(Arc::clone(&remote)),
            Arc::new(ManualClock::new(NOW)),
            DOMAIN_A,
            PrivacySignals::none(),
        );
        tab.controller.initialize().await;
        tab.controller.accept_all().await;
        remote.set_failing(!remote_up);

        let first = tab.controller.revoke().await;
        assert!(tab.cache.read().is_none());
        let second = tab.controller.revoke().await;
        assert!(tab.cache.read().is_none());

        assert_eq!(first.success, remote_up);
        assert_eq!(second.success, remote_up);
        assert_eq!(tab.controller.decision(), DecisionState::FirstVisit);
        assert_eq!(remote.revoke_calls(), 2);
    }
}

#[tokio::test]
async fn test_local_only_revoke_twice() {
    let origin = InMemoryStorage::new();
    let tab = open_tab(
        &origin,
        None,
        Arc::new(ManualClock::new(NOW)),
        DOMAIN_A,
        PrivacySignals::none(),
    );
    tab.controller.initialize().await;
    tab.controller.reject_all().await;

    assert!(tab.controller.revoke().await.success);
    assert!(tab.controller.revoke().await.success);
    assert!(tab.cache.read().is_none());
}

// =============================================================================
// JURISDICTION DEFAULT SELECTION
// =============================================================================

#[test]
fn test_gpc_selects_ccpa_otherwise_default() {
    assert_eq!(detect_jurisdiction(&PrivacySignals::with_gpc()), Jurisdiction::Ccpa);
    assert_eq!(detect_jurisdiction(&PrivacySignals::none()), Jurisdiction::Default);
}

#[tokio::test]
async fn test_controller_session_follows_signal() {
    for (signals, expected) in [
        (PrivacySignals::with_gpc(), Jurisdiction::Ccpa),
        (PrivacySignals::none(), Jurisdiction::Default),
    ] {
        let tab = open_tab(
            &InMemoryStorage::new(),
            None,
            Arc::new(ManualClock::new(NOW)),
            DOMAIN_A,
            signals,
        );
        let snapshot = tab.controller.initialize().await;
        assert_eq!(snapshot.jurisdiction, expected);
        assert_eq!(tab.controller.policy().jurisdiction, expected);
    }
}

// =============================================================================
// CROSS-TAB CONVERGENCE
// =============================================================================

#[tokio::test]
async fn test_other_tab_save_reaches_this_tab() {
    let origin = InMemoryStorage::new();
    let clock = Arc::new(ManualClock::new(NOW));
    let tab_a = open_tab(&origin, None, clock.clone(), DOMAIN_A, PrivacySignals::none());
    let tab_b = open_tab(&origin, None, clock, DOMAIN_A, PrivacySignals::none());

    tab_a.controller.initialize().await;
    tab_b.controller.initialize().await;
    assert!(!tab_b.controller.has_consent_for(ConsentCategory::Analytics));

    let mut events_b = tab_b.bus.subscribe(EventFilter::topics(vec![EventTopic::Updated]));
    let listener = Arc::clone(&tab_b.controller).start().unwrap();

    tab_a
        .controller
        .set_consent(PreferencesUpdate::set(ConsentCategory::Analytics, true))
        .await;

    wait_until("tab B to adopt analytics", || {
        tab_b.controller.has_consent_for(ConsentCategory::Analytics)
    })
    .await;
    assert_eq!(tab_b.controller.decision(), DecisionState::Decided);

    let event = events_b.recv().await.unwrap();
    assert_eq!(event.origin(), ChangeOrigin::OtherTab);
    assert!(event.change().preferences.analytics);

    listener.stop().await;
}

#[tokio::test]
async fn test_other_tab_revoke_reaches_this_tab() {
    let origin = InMemoryStorage::new();
    let clock = Arc::new(ManualClock::new(NOW));
    let tab_a = open_tab(&origin, None, clock.clone(), DOMAIN_A, PrivacySignals::none());
    tab_a.controller.initialize().await;
    tab_a.controller.accept_all().await;

    let tab_b = open_tab(&origin, None, clock.clone(), DOMAIN_A, PrivacySignals::none());
    assert_eq!(
        tab_b.controller.initialize().await.decision,
        DecisionState::Decided
    );
    let listener = Arc::clone(&tab_b.controller).start().unwrap();

    clock.advance(1_000);
    tab_a.controller.revoke().await;

    wait_until("tab B to fall back to defaults", || {
        tab_b.controller.decision() == DecisionState::FirstVisit
    })
    .await;
    assert!(!tab_b.controller.has_consent_for(ConsentCategory::Marketing));

    listener.stop().await;
}
