//! Configuration for registry connections and environment loading

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Per-request timeout applied to every registry call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Basic credentials attached to registry requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl AuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Endpoint and credentials for one registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConnection {
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Self-hosted registries commonly present self-signed certificates,
    /// so verification is off unless asked for.
    #[serde(default)]
    pub verify_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl RegistryConnection {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            verify_tls: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// URL used as the prefix of every request path, without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Credentials are only sent when both halves are non-empty.
    pub fn credentials(&self) -> Option<AuthConfig> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some(AuthConfig::new(user, pass))
            }
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(RegistryError::Validation(
                "registry URL cannot be empty".to_string(),
            ));
        }

        let parsed = url::Url::parse(self.base_url())?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(RegistryError::Validation(format!(
                    "registry URL must use http or https, got {}",
                    other
                )));
            }
        }

        if parsed.host_str().is_none() {
            return Err(RegistryError::Validation(format!(
                "registry URL has no host: {}",
                self.url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(RegistryError::Validation(
                "timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Settings loaded from the process environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub connection: RegistryConnection,
}

impl AppConfig {
    /// Reads `REGISTRY_URL` (required), `REGISTRY_USERNAME`, `REGISTRY_PASSWORD`,
    /// `REGISTRY_VERIFY_TLS` and `REGISTRY_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("REGISTRY_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RegistryError::Config("REGISTRY_URL not set".to_string()))?;

        let verify_tls = lookup("REGISTRY_VERIFY_TLS")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let timeout_secs = lookup("REGISTRY_TIMEOUT")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let connection = RegistryConnection {
            url,
            username: lookup("REGISTRY_USERNAME"),
            password: lookup("REGISTRY_PASSWORD"),
            verify_tls,
            timeout_secs,
        };
        connection.validate()?;

        Ok(Self { connection })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
