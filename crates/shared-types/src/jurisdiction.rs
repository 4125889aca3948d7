//! # Jurisdiction Codes
//!
//! The regulatory regimes that decide default consent posture.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A regulatory regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Jurisdiction {
    /// EU General Data Protection Regulation.
    #[serde(rename = "GDPR")]
    Gdpr,
    /// California Consumer Privacy Act.
    #[serde(rename = "CCPA")]
    Ccpa,
    /// India Digital Personal Data Protection Act.
    #[serde(rename = "DPDP")]
    Dpdp,
    /// Fallback policy when nothing more specific applies.
    #[default]
    #[serde(rename = "DEFAULT")]
    Default,
}

impl Jurisdiction {
    /// Uppercase wire code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Gdpr => "GDPR",
            Self::Ccpa => "CCPA",
            Self::Dpdp => "DPDP",
            Self::Default => "DEFAULT",
        }
    }

    /// Parse a code, mapping anything unknown to `Default`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "GDPR" => Self::Gdpr,
            "CCPA" => Self::Ccpa,
            "DPDP" => Self::Dpdp,
            _ => Self::Default,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Jurisdiction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_code(s))
    }
}
