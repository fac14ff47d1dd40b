//! Client configuration structures
//!
//! Deserialized from JSON or TOML by the infra config loader. JWT
//! proof-of-possession cannot be configured here because it needs a live
//! signing capability.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TIMEOUT;

/// Transport-level settings for one Horizon instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonConfig {
    /// Endpoint without any API path, e.g. `https://horizon.example.com`.
    pub base_url: String,
    /// Request timeout; defaults to 30 seconds.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// Proxy URL. Requests go direct when unset.
    #[serde(default)]
    pub proxy: Option<String>,
    /// PEM file with additional trust anchors.
    #[serde(default)]
    pub ca_bundle_path: Option<PathBuf>,
    /// Disable server certificate checks. Test rigs only.
    #[serde(default)]
    pub skip_tls_verify: bool,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Credential to install when the client is built.
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

impl HorizonConfig {
    /// Settings for `base_url` with everything else defaulted.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: None,
            proxy: None,
            ca_bundle_path: None,
            skip_tls_verify: false,
            user_agent: None,
            auth: None,
        }
    }

    /// Effective request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout_seconds.map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }
}

/// Credential configured ahead of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AuthConfig {
    /// API identifier and secret key.
    SharedSecret { api_id: String, api_key: String },
    /// PEM files for mutual TLS.
    ClientCertificate { certificate_path: PathBuf, private_key_path: PathBuf },
}
