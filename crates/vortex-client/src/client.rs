//! Typed configuration client.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use vortex_core::{ConfigKey, RawValue, Result, encode};
use vortex_kv::{HttpKvStore, HttpStoreConfig, KvStore};

use crate::cache::{CacheConfig, CacheLayer};
use crate::settings::ClientSettings;

/// Public typed API over the remote store.
///
/// Every operation is routed through a [`CacheLayer`]. Getters never fail:
/// absent keys, store outages and type mismatches all yield the default.
/// Only [`set`](Self::set) reports errors.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vortex_client::{CacheConfig, ConfigClient};
/// use vortex_kv::MemoryKvStore;
///
/// # #[tokio::main]
/// # async fn main() -> vortex_core::Result<()> {
/// let client = ConfigClient::new(Arc::new(MemoryKvStore::new()), CacheConfig::default());
///
/// client.set("feature.enabled", &true).await?;
/// assert!(client.get_or("feature.enabled", false).await);
/// assert!(client.exists("feature.enabled").await);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigClient {
    layer: CacheLayer,
}

impl ConfigClient {
    /// Creates a client caching reads from `store` with the default Moka cache store.
    pub fn new(store: Arc<dyn KvStore>, config: CacheConfig) -> Self {
        Self::from_layer(CacheLayer::new(store, config))
    }

    /// Creates a client whose reads always go to `store`.
    pub fn uncached(store: Arc<dyn KvStore>) -> Self {
        Self::from_layer(CacheLayer::uncached(store))
    }

    /// Creates a client over an already configured cache layer.
    pub fn from_layer(layer: CacheLayer) -> Self {
        Self { layer }
    }

    /// Builds an HTTP-backed client from loaded settings.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let mut builder = HttpStoreConfig::builder()
            .base_url(&settings.store.base_url)
            .timeout(settings.store.timeout);
        if let Some(token) = &settings.store.token {
            builder = builder.token(token);
        }

        let store: Arc<dyn KvStore> = Arc::new(HttpKvStore::new(builder.build()?)?);

        Ok(if settings.cache.enabled {
            Self::new(store, settings.cache.to_cache_config())
        } else {
            Self::uncached(store)
        })
    }

    /// Returns the underlying cache layer.
    pub fn cache(&self) -> &CacheLayer {
        &self.layer
    }

    /// Reads `key` as `T`, or `None` when it is absent or unreadable.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let key = parse_key(key)?;
        self.layer.read_through(&key).await
    }

    /// Reads `key` as `T`, falling back to `default`.
    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).await.unwrap_or(default)
    }

    /// Reads `key` as a string.
    pub async fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).await
    }

    /// Reads `key` as a list of strings.
    pub async fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).await
    }

    /// Reads `key` as a string-to-string map.
    pub async fn get_dictionary(&self, key: &str) -> Option<HashMap<String, String>> {
        self.get(key).await
    }

    /// Every key with its value, or an empty map when the store is unreachable.
    pub async fn get_all(&self) -> IndexMap<String, RawValue> {
        self.layer.all_values().await.unwrap_or_default()
    }

    /// Every key known to the store, or an empty list when it is unreachable.
    pub async fn get_all_keys(&self) -> Vec<String> {
        self.layer.all_keys().await.unwrap_or_default()
    }

    /// True when a `get` of `key` would yield a non-null value.
    pub async fn exists(&self, key: &str) -> bool {
        match parse_key(key) {
            Some(key) => self.layer.exists(&key).await,
            None => false,
        }
    }

    /// Writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// - `KvError::InvalidKey` for an empty key
    /// - `KvError::WriteFailure` if the value cannot be encoded or the store
    ///   rejects the write; the cache is left untouched
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let key = ConfigKey::new(key)?;
        let raw = encode(key.as_str(), value)?;
        self.layer.write_through(&key, raw).await
    }
}

fn parse_key(key: &str) -> Option<ConfigKey> {
    match ConfigKey::new(key) {
        Ok(key) => Some(key),
        Err(e) => {
            warn!(error = %e, "Invalid key on read, returning default");
            None
        },
    }
}
