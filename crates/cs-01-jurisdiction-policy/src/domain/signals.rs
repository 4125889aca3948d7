//! # Privacy Signals
//!
//! Explicit inputs to jurisdiction detection. Callers read whatever runtime
//! flags they have (a `Sec-GPC` header, `navigator.globalPrivacyControl`, a
//! geo-IP lookup) and pass them in.

use serde::{Deserialize, Serialize};

/// Signals available at session start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySignals {
    /// Global Privacy Control opt-out is present.
    #[serde(default)]
    pub global_privacy_control: bool,

    /// Region hint from an external geo lookup: ISO 3166-1 alpha-2 country
    /// code, optionally with a subdivision (`US-CA`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl PrivacySignals {
    /// No signals at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Only a GPC signal.
    #[must_use]
    pub fn with_gpc() -> Self {
        Self {
            global_privacy_control: true,
            region: None,
        }
    }

    /// Add a region hint.
    #[must_use]
    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Interpret a `Sec-GPC` request header value.
    #[must_use]
    pub fn from_gpc_header(value: Option<&str>) -> Self {
        Self {
            global_privacy_control: value.map(|v| v.trim() == "1").unwrap_or(false),
            region: None,
        }
    }
}
