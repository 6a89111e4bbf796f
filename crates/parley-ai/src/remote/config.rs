//! Remote backend configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use parley_config::{BackendSettings, RetrySettings};

use crate::AiError;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Settings for [`RemoteBackend`](super::RemoteBackend). The credential is
/// passed in; the backend itself never reads the environment.
#[derive(Clone)]
pub struct RemoteConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub timeout: Duration,
    pub proxies: BTreeMap<String, String>,
    pub retry: RetrySettings,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("proxies", &self.proxies)
            .field("retry", &self.retry)
            .finish()
    }
}

impl RemoteConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_settings(api_key, &BackendSettings::default())
    }

    /// Combine a credential with the backend section of a session config.
    pub fn from_settings(api_key: impl Into<String>, settings: &BackendSettings) -> Self {
        Self {
            api_key: api_key.into(),
            model: settings.remote.model.clone(),
            api_url: settings.remote.api_url.clone(),
            timeout: settings.remote.timeout,
            proxies: settings.remote.proxies.clone(),
            retry: settings.retry,
        }
    }

    /// Read the credential from `OPENAI_API_KEY`. A missing key is a
    /// startup failure.
    pub fn from_env(settings: &BackendSettings) -> Result<Self, AiError> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| AiError::MissingCredential(format!("{API_KEY_ENV} is not set")))?;
        Ok(Self::from_settings(key, settings))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, scheme: impl Into<String>, url: impl Into<String>) -> Self {
        self.proxies.insert(scheme.into(), url.into());
        self
    }

    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let config = RemoteConfig::new("sk-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn from_settings_copies_backend_section() {
        let mut settings = BackendSettings::default();
        settings.remote.model = "gpt-4o-mini".into();
        settings
            .remote
            .proxies
            .insert("https".into(), "http://proxy:8080".into());
        let config = RemoteConfig::from_settings("key", &settings);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.proxies.len(), 1);
        assert_eq!(config.retry.max_attempts, 5);
    }
}
