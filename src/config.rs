//! # Configuration
//!
//! Configuration is built once by the host (from a parameter store, secrets
//! manager, environment, or a file) and handed to [`crate::Endpoint::new`].
//! Nothing in the library reads configuration from process-wide state.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

const DEFAULT_SESSION_TTL: i64 = 7200;
const DEFAULT_AUTHORIZATION_CODE_TTL: i64 = 600;
const DEFAULT_ACCESS_TOKEN_TTL: i64 = 3600;

/// Immutable configuration for session, token, and check result handling.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Lifetime of a session, in seconds.
    pub session_ttl: i64,

    /// Lifetime of an authorization code, in seconds.
    pub authorization_code_ttl: i64,

    /// Lifetime of an access token, in seconds.
    pub access_token_ttl: i64,

    /// Fraud check provider connection details.
    pub provider: ProviderConfig,

    /// Maps provider fraud codes to contra-indicator codes. Provider codes
    /// with no entry raise no contra-indicator.
    pub contra_indicators: BTreeMap<String, String>,
}

/// Fraud check provider connection details. Credentials are resolved by the
/// host's HTTP client and never held here.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider verification endpoint.
    pub endpoint: String,

    /// Tenant identifier issued by the provider.
    pub tenant_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
            authorization_code_ttl: DEFAULT_AUTHORIZATION_CODE_TTL,
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            provider: ProviderConfig::default(),
            contra_indicators: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Parse and validate configuration from JSON. Missing fields take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any TTL is not positive.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check configuration values are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if any TTL is zero or negative.
    pub fn validate(&self) -> Result<()> {
        for (name, ttl) in [
            ("session_ttl", self.session_ttl),
            ("authorization_code_ttl", self.authorization_code_ttl),
            ("access_token_ttl", self.access_token_ttl),
        ] {
            if ttl <= 0 {
                bail!("`{name}` must be greater than zero, got {ttl}");
            }
        }
        Ok(())
    }

    /// Session lifetime. TTLs beyond the representable range saturate.
    #[must_use]
    pub fn session_duration(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.session_ttl).unwrap_or(TimeDelta::MAX)
    }

    /// Authorization code lifetime.
    #[must_use]
    pub fn authorization_code_duration(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.authorization_code_ttl).unwrap_or(TimeDelta::MAX)
    }

    /// Access token lifetime.
    #[must_use]
    pub fn access_token_duration(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.access_token_ttl).unwrap_or(TimeDelta::MAX)
    }
}
