//! # Fake Remote Consent Store
//!
//! An axum server speaking the remote store's JSON routes, keyed by an
//! anonymous user id carried in a cookie. Used to exercise the HTTP adapter
//! end to end.
//!
//! | Route | Behavior |
//! |-------|----------|
//! | `GET  /api/consent/check` | Record for the cookie's user, or 404 |
//! | `POST /api/consent/save` | Store the record; issue a cookie on first save |
//! | `POST /api/consent/revoke` | Drop the record (idempotent) |

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cs_03_cross_domain_sync::{
    CheckResponse, RevokeRequest, RevokeResponse, SaveRequest, SaveResponse,
};
use parking_lot::Mutex;
use shared_types::ConsentRecord;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Cookie carrying the anonymous user id.
pub const USER_COOKIE: &str = "consent_uid";

#[derive(Default)]
struct FakeStoreState {
    records: Mutex<HashMap<String, ConsentRecord>>,
    next_id: AtomicU64,
    failing: AtomicBool,
    rejecting: AtomicBool,
    requests: AtomicUsize,
    applies_to: Vec<String>,
}

impl FakeStoreState {
    fn issue_id(&self) -> String {
        format!("user-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// A running fake store. The server stops when this is dropped.
pub struct FakeConsentStore {
    state: Arc<FakeStoreState>,
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl FakeConsentStore {
    /// Bind to an ephemeral local port and start serving. Saves report
    /// `applies_to` as the domains sharing the decision.
    pub async fn spawn(applies_to: Vec<String>) -> std::io::Result<Self> {
        let state = Arc::new(FakeStoreState {
            applies_to,
            ..FakeStoreState::default()
        });

        let app = Router::new()
            .route("/api/consent/check", get(check))
            .route("/api/consent/save", post(save))
            .route("/api/consent/revoke", post(revoke))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { state, addr, task })
    }

    /// Base URL to configure the sync client with.
    pub fn endpoint(&self) -> String {
        format!("http://{}/api/consent", self.addr)
    }

    /// Answer every request with 500 (or stop doing so).
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Answer saves with `success: false` (or stop doing so).
    pub fn set_rejecting(&self, rejecting: bool) {
        self.state.rejecting.store(rejecting, Ordering::SeqCst);
    }

    /// Record stored for `user_id`.
    pub fn record_for(&self, user_id: &str) -> Option<ConsentRecord> {
        self.state.records.lock().get(user_id).cloned()
    }

    /// Number of users holding a record.
    pub fn record_count(&self) -> usize {
        self.state.records.lock().len()
    }

    /// Requests served so far.
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

impl Drop for FakeConsentStore {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn user_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| pair.trim().strip_prefix(USER_COOKIE)?.strip_prefix('='))
        .map(str::to_string)
}

/// Count the request; `Some` if the store is configured to fail it.
fn begin(state: &FakeStoreState) -> Option<Response> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    state
        .failing
        .load(Ordering::SeqCst)
        .then(|| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn check(State(state): State<Arc<FakeStoreState>>, headers: HeaderMap) -> Response {
    if let Some(failure) = begin(&state) {
        return failure;
    }
    let record = user_id(&headers).and_then(|id| state.records.lock().get(&id).cloned());
    match record {
        Some(record) => Json(CheckResponse::from_record(&record)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn save(
    State(state): State<Arc<FakeStoreState>>,
    headers: HeaderMap,
    Json(request): Json<SaveRequest>,
) -> Response {
    if let Some(failure) = begin(&state) {
        return failure;
    }
    if state.rejecting.load(Ordering::SeqCst) {
        return Json(SaveResponse {
            success: false,
            message: "Policy version not accepted".to_string(),
            ..SaveResponse::default()
        })
        .into_response();
    }

    let (id, issued) = match user_id(&headers) {
        Some(id) => (id, false),
        None => (state.issue_id(), true),
    };
    let record = ConsentRecord::new(
        request.preferences,
        request.timestamp,
        request.domain,
        request.organization_id,
        request.version,
    )
    .with_user_id(Some(id.clone()));
    state.records.lock().insert(id.clone(), record);

    let body = Json(SaveResponse {
        success: true,
        message: "Consent saved".to_string(),
        consent_id: Some(format!("consent-{id}")),
        applies_to: state.applies_to.clone(),
    });
    if issued {
        let cookie = format!("{USER_COOKIE}={id}; Path=/; HttpOnly");
        ([(SET_COOKIE, cookie)], body).into_response()
    } else {
        body.into_response()
    }
}

async fn revoke(
    State(state): State<Arc<FakeStoreState>>,
    headers: HeaderMap,
    Json(_request): Json<RevokeRequest>,
) -> Response {
    if let Some(failure) = begin(&state) {
        return failure;
    }
    if let Some(id) = user_id(&headers) {
        state.records.lock().remove(&id);
    }
    Json(RevokeResponse {
        success: true,
        message: "Consent revoked".to_string(),
    })
    .into_response()
}
