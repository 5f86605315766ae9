use std::time::Duration;

use crate::error::SyncError;

pub const SCALEWAY_API_BASE: &str = "https://api.scaleway.com";
pub const DEFAULT_REGION: &str = "fr-par";
pub const DEFAULT_WAIT_RETRY_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_INSTANCE_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Timing used by every wait unless a call site overrides it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitSettings {
    pub retry_interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            retry_interval: DEFAULT_WAIT_RETRY_INTERVAL,
            timeout: DEFAULT_INSTANCE_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub secret_key: Option<String>,
    pub default_region: String,
    pub api_url: String,
    pub wait: WaitSettings,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            default_region: DEFAULT_REGION.to_string(),
            api_url: SCALEWAY_API_BASE.to_string(),
            wait: WaitSettings::default(),
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.default_region.is_empty() {
            return Err(SyncError::Config("region must not be empty".to_string()));
        }
        if self.wait.retry_interval.is_zero() {
            return Err(SyncError::Config(
                "wait retry interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_region", &self.default_region)
            .field("api_url", &self.api_url)
            .field("wait", &self.wait)
            .finish()
    }
}
