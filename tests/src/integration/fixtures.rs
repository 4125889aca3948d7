//! Shared fixtures: one browser origin per domain, tabs on top of it, and a
//! remote store shared by the whole domain group.

use std::sync::Arc;
use std::time::Duration;

use cs_01_jurisdiction_policy::PrivacySignals;
use cs_02_local_cache::{InMemoryStorage, LocalConsentCache};
use cs_03_cross_domain_sync::{CrossDomainSyncApi, CrossDomainSyncClient, MockRemoteStore, SyncConfig};
use cs_04_consent_controller::{ConsentStateController, ControllerConfig};
use shared_bus::InMemoryEventBus;
use shared_types::{ConsentPreferences, ConsentRecord, ManualClock};

pub const NOW: u64 = 1_700_000_000_000;
pub const DOMAIN_A: &str = "a.example";
pub const DOMAIN_B: &str = "b.example";

/// Sync settings for one member of the test domain group.
pub fn sync_config(domain: &str) -> SyncConfig {
    SyncConfig {
        domain: domain.to_string(),
        ..SyncConfig::for_testing()
    }
}

/// A record as the test organization would store it.
pub fn record_at(preferences: ConsentPreferences, timestamp: u64, domain: &str) -> ConsentRecord {
    let config = SyncConfig::for_testing();
    ConsentRecord::new(
        preferences,
        timestamp,
        domain,
        config.organization_id,
        config.policy_version,
    )
}

/// One browser tab: its own controller and bus over the origin's storage.
pub struct Tab {
    pub cache: LocalConsentCache,
    pub bus: Arc<InMemoryEventBus>,
    pub sync: Option<Arc<CrossDomainSyncClient<MockRemoteStore>>>,
    pub controller: Arc<ConsentStateController>,
}

impl Tab {
    /// The sync client; panics for local-only tabs.
    pub fn sync(&self) -> &CrossDomainSyncClient<MockRemoteStore> {
        self.sync.as_deref().expect("tab has no sync client")
    }
}

/// Open a tab on `origin` for `domain`. Without `remote` the tab is
/// local-only.
pub fn open_tab(
    origin: &InMemoryStorage,
    remote: Option<Arc<MockRemoteStore>>,
    clock: Arc<ManualClock>,
    domain: &str,
    signals: PrivacySignals,
) -> Tab {
    let config = sync_config(domain);
    let cache = LocalConsentCache::new(Arc::new(origin.tab()));
    let bus = Arc::new(InMemoryEventBus::new());

    let sync = remote.map(|remote| {
        Arc::new(CrossDomainSyncClient::new(
            config.clone(),
            cache.clone(),
            remote,
            Arc::clone(&bus),
            clock.clone(),
        ))
    });

    let controller_config = ControllerConfig {
        remote_sync_enabled: sync.is_some(),
        ..ControllerConfig::from_sync_config(&config)
    };
    let controller = Arc::new(ConsentStateController::new(
        controller_config,
        cache.clone(),
        sync.clone().map(|s| s as Arc<dyn CrossDomainSyncApi>),
        Arc::clone(&bus),
        clock,
        signals,
    ));

    Tab {
        cache,
        bus,
        sync,
        controller,
    }
}

/// Poll `condition` until it holds, failing the test after two seconds.
pub async fn wait_until<F>(what: &str, mut condition: F)
where
    F: FnMut() -> bool,
{
    let waited = tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "timed out waiting for {what}");
}
