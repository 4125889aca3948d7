//! # Outbound Ports
//!
//! The remote consent store shared by every domain in a group.
//!
//! Production: `HttpRemoteConsentStore` (adapters/http.rs)
//! Testing: `MockRemoteStore` (below)

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::ConsentRecord;

use crate::domain::{
    CheckResponse, RevokeRequest, RevokeResponse, SaveRequest, SaveResponse, SyncError,
};

/// Remote consent store - outbound port.
///
/// The anonymous user is identified by a cookie the transport carries.
#[async_trait]
pub trait RemoteConsentStore: Send + Sync {
    /// Fetch the stored decision. `Ok(None)` means the store has no record.
    async fn check(&self) -> Result<Option<CheckResponse>, SyncError>;

    /// Store a decision.
    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, SyncError>;

    /// Remove the stored decision.
    async fn revoke(&self, request: &RevokeRequest) -> Result<RevokeResponse, SyncError>;

    /// Store location (for logging).
    fn endpoint(&self) -> &str;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// In-memory remote store holding a single user's record.
///
/// Share one instance (`Arc`) between clients to model several domains of
/// the same group talking to the same store.
#[derive(Debug, Default)]
pub struct MockRemoteStore {
    record: Mutex<Option<ConsentRecord>>,
    should_fail: AtomicBool,
    check_calls: AtomicUsize,
    save_calls: AtomicUsize,
    revoke_calls: AtomicUsize,
}

impl MockRemoteStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store already holding `record`.
    pub fn with_record(record: ConsentRecord) -> Self {
        let store = Self::default();
        *store.record.lock() = Some(record);
        store
    }

    /// Make every call fail with a network error (or stop failing).
    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    /// Replace the stored record directly, as another domain would.
    pub fn set_record(&self, record: Option<ConsentRecord>) {
        *self.record.lock() = record;
    }

    /// The stored record.
    pub fn record(&self) -> Option<ConsentRecord> {
        self.record.lock().clone()
    }

    /// Number of `check` calls.
    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    /// Number of `save` calls.
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Number of `revoke` calls.
    pub fn revoke_calls(&self) -> usize {
        self.revoke_calls.load(Ordering::SeqCst)
    }

    fn fail_if_configured(&self) -> Result<(), SyncError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SyncError::Network("Mock failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteConsentStore for MockRemoteStore {
    async fn check(&self) -> Result<Option<CheckResponse>, SyncError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if_configured()?;
        Ok(self.record.lock().as_ref().map(CheckResponse::from_record))
    }

    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, SyncError> {
        let call = self.save_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.fail_if_configured()?;
        *self.record.lock() = Some(ConsentRecord::new(
            request.preferences,
            request.timestamp,
            request.domain.clone(),
            request.organization_id.clone(),
            request.version.clone(),
        ));
        Ok(SaveResponse {
            success: true,
            message: "Consent saved".to_string(),
            consent_id: Some(format!("mock-consent-{call}")),
            applies_to: vec![request.domain.clone()],
        })
    }

    async fn revoke(&self, _request: &RevokeRequest) -> Result<RevokeResponse, SyncError> {
        self.revoke_calls.fetch_add(1, Ordering::SeqCst);
        self.fail_if_configured()?;
        *self.record.lock() = None;
        Ok(RevokeResponse {
            success: true,
            message: "Consent revoked".to_string(),
        })
    }

    fn endpoint(&self) -> &str {
        "mock://consent"
    }
}
