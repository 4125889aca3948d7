//! # Wiring
//!
//! Composes the subsystems into one runtime.
//!
//! ```text
//!  FileStorage ──→ LocalConsentCache ──┬──→ CrossDomainSyncClient ──→ remote store
//!                                      │            │  (optional)
//!                                      │            ↓
//!                                      └──→ ConsentStateController ←── InMemoryEventBus
//! ```
//!
//! Background work (periodic sync, cross-tab and cross-domain listening) only
//! runs between [`ConsentRuntime::start`] and [`ConsentRuntime::shutdown`].

use std::sync::Arc;
use std::time::Duration;

use cs_02_local_cache::{FileStorage, KeyValueStorage, LocalConsentCache, StorageError};
use cs_03_cross_domain_sync::{
    CrossDomainSyncApi, CrossDomainSyncClient, HttpRemoteConsentStore, PeriodicSync,
    RemoteConsentStore, SyncError, SyncHandle,
};
use cs_04_consent_controller::{
    ConsentStateApi, ConsentStateController, ControllerError, ControllerHandle,
};
use parking_lot::Mutex;
use shared_bus::InMemoryEventBus;
use shared_types::{Clock, SystemClock};
use thiserror::Error;
use tracing::info;

use crate::container::RuntimeConfig;

/// Runtime assembly and lifecycle errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The storage file could not be opened.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// The remote store client could not be built.
    #[error("sync: {0}")]
    Sync(#[from] SyncError),

    /// The controller refused to start.
    #[error("controller: {0}")]
    Controller(#[from] ControllerError),
}

#[derive(Default)]
struct Background {
    controller: Option<ControllerHandle>,
    periodic: Option<SyncHandle>,
}

/// The composed consent runtime.
pub struct ConsentRuntime {
    controller: Arc<ConsentStateController>,
    sync: Option<Arc<dyn CrossDomainSyncApi>>,
    bus: Arc<InMemoryEventBus>,
    sync_interval: Duration,
    background: Mutex<Background>,
}

impl ConsentRuntime {
    /// Build the production runtime: file storage under `data_dir` and, when
    /// an endpoint is configured, the HTTP remote store.
    pub fn new(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::in_dir(&config.data_dir)?);
        let remote = if config.remote_sync_enabled {
            Some(Arc::new(HttpRemoteConsentStore::new(&config.sync)?))
        } else {
            None
        };
        Ok(Self::assemble(config, storage, remote, Arc::new(SystemClock)))
    }

    /// Build a runtime from explicit parts.
    pub fn assemble<R>(
        config: &RuntimeConfig,
        storage: Arc<dyn KeyValueStorage>,
        remote: Option<Arc<R>>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        R: RemoteConsentStore + 'static,
    {
        let cache = LocalConsentCache::new(storage);
        let bus = Arc::new(InMemoryEventBus::new());

        let sync = remote.map(|remote| {
            Arc::new(CrossDomainSyncClient::new(
                config.sync.clone(),
                cache.clone(),
                remote,
                Arc::clone(&bus),
                Arc::clone(&clock),
            )) as Arc<dyn CrossDomainSyncApi>
        });

        let controller = Arc::new(ConsentStateController::new(
            config.controller_config(),
            cache,
            sync.clone(),
            Arc::clone(&bus),
            clock,
            config.signals.clone(),
        ));

        info!(
            domain = %config.sync.domain,
            remote_sync = sync.is_some(),
            "[runtime] Consent runtime assembled"
        );

        Self {
            controller,
            sync,
            bus,
            sync_interval: config.sync.sync_interval(),
            background: Mutex::new(Background::default()),
        }
    }

    /// The consent state controller.
    pub fn controller(&self) -> &Arc<ConsentStateController> {
        &self.controller
    }

    /// The sync client, if remote sync is configured.
    pub fn sync(&self) -> Option<&Arc<dyn CrossDomainSyncApi>> {
        self.sync.as_ref()
    }

    /// The event bus.
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Resolve the initial state, then start background listening and, if
    /// configured, periodic sync.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(&self) -> Result<(), RuntimeError> {
        let snapshot = self.controller.initialize().await;
        info!(
            decision = ?snapshot.decision,
            jurisdiction = %snapshot.jurisdiction,
            "[runtime] Initial consent state resolved"
        );

        let handle = Arc::clone(&self.controller).start()?;
        let periodic = self
            .sync
            .as_ref()
            .map(|sync| PeriodicSync::spawn(Arc::clone(sync), self.sync_interval));

        let mut background = self.background.lock();
        background.controller = Some(handle);
        background.periodic = periodic;
        Ok(())
    }

    /// Whether background tasks are running.
    pub fn is_running(&self) -> bool {
        self.background
            .lock()
            .controller
            .as_ref()
            .is_some_and(ControllerHandle::is_running)
    }

    /// Stop background tasks and wait for them to exit.
    pub async fn shutdown(&self) {
        let Background {
            controller,
            periodic,
        } = std::mem::take(&mut *self.background.lock());

        if let Some(periodic) = periodic {
            periodic.stop().await;
        }
        if let Some(controller) = controller {
            controller.stop().await;
        }
        info!("[runtime] Consent runtime stopped");
    }
}
