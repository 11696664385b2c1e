//! HTTP store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vortex_core::{KvError, Result};

/// Configuration for the HTTP key-value store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpStoreConfig {
    /// Base URL of the KV endpoint (e.g. `http://127.0.0.1:8500/v1/kv`).
    base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    timeout: Duration,

    /// ACL token sent as `X-Consul-Token` (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

impl HttpStoreConfig {
    /// Creates a new builder for HttpStoreConfig.
    pub fn builder() -> HttpStoreConfigBuilder {
        HttpStoreConfigBuilder::default()
    }

    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the ACL token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the URL of a single key.
    ///
    /// Every path segment is percent-encoded; `/` separators are kept so
    /// hierarchical keys map onto the store's folders.
    pub fn key_url(&self, key: &str) -> String {
        let path = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.base_url(), path)
    }

    /// Returns the URL listing every key.
    pub fn keys_url(&self) -> String {
        format!("{}/?keys", self.base_url())
    }
}

/// Builder for HttpStoreConfig.
#[derive(Debug, Default)]
pub struct HttpStoreConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    token: Option<String>,
}

impl HttpStoreConfigBuilder {
    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the ACL token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `KvError::InvalidConfig` if the base URL is missing or is not
    /// an `http`/`https` URL.
    pub fn build(self) -> Result<HttpStoreConfig> {
        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| KvError::invalid_config("base_url is required"))?;

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(KvError::invalid_config(format!(
                "base_url must be an http(s) URL: {base_url}"
            )));
        }

        Ok(HttpStoreConfig {
            base_url,
            timeout: self.timeout.unwrap_or_else(default_timeout),
            token: self.token,
        })
    }
}
