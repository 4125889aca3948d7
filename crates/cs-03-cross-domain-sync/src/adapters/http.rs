//! HTTP Remote Store Adapter
//!
//! Implements `RemoteConsentStore` over the store's JSON routes. The cookie
//! jar carries the anonymous user id between calls.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::SyncConfig;
use crate::domain::{
    CheckResponse, RevokeRequest, RevokeResponse, SaveRequest, SaveResponse, SyncError,
};
use crate::ports::outbound::RemoteConsentStore;

/// reqwest-backed remote consent store.
pub struct HttpRemoteConsentStore {
    client: Client,
    endpoint: String,
}

impl HttpRemoteConsentStore {
    /// Build a client with the configured deadlines and a cookie store.
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| SyncError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.endpoint, route)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SyncError> {
        response
            .json::<T>()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))
    }

    fn ensure_success(response: &Response) -> Result<(), SyncError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Status(status.as_u16()))
        }
    }
}

fn transport_error(e: reqwest::Error) -> SyncError {
    if e.is_timeout() {
        SyncError::Network(format!("timed out: {e}"))
    } else {
        SyncError::Network(e.to_string())
    }
}

#[async_trait]
impl RemoteConsentStore for HttpRemoteConsentStore {
    async fn check(&self) -> Result<Option<CheckResponse>, SyncError> {
        let url = self.url("check");
        debug!(%url, "[cs-03] Checking remote consent");

        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::ensure_success(&response)?;
        Self::decode(response).await.map(Some)
    }

    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, SyncError> {
        let url = self.url("save");
        debug!(%url, timestamp = request.timestamp, "[cs-03] Saving remote consent");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        Self::ensure_success(&response)?;

        let body: SaveResponse = Self::decode(response).await?;
        if !body.success {
            return Err(SyncError::Rejected(body.message));
        }
        Ok(body)
    }

    async fn revoke(&self, request: &RevokeRequest) -> Result<RevokeResponse, SyncError> {
        let url = self.url("revoke");
        debug!(%url, "[cs-03] Revoking remote consent");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        Self::ensure_success(&response)?;

        let body: RevokeResponse = Self::decode(response).await?;
        if !body.success {
            return Err(SyncError::Rejected(body.message));
        }
        Ok(body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
