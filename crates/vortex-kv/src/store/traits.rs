//! Key-value store trait definition.

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::debug;
use vortex_core::{RawValue, Result};

/// A remote key-value store holding configuration values.
///
/// This trait abstracts over the transport used to reach the store so that
/// the caching client can be composed over any implementation.
///
/// # Implementors
///
/// - `HttpKvStore` - Consul-style KV HTTP API
/// - `MemoryKvStore` - In-process store for local development and tests
///
/// # Example
///
/// ```ignore
/// use vortex_kv::KvStore;
///
/// struct MyStore;
///
/// #[async_trait]
/// impl KvStore for MyStore {
///     async fn get_value(&self, key: &str) -> Result<RawValue> {
///         Err(KvError::not_found(key))
///     }
///
///     async fn list_keys(&self) -> Result<Vec<String>> {
///         Ok(vec![])
///     }
///
///     async fn put_value(&self, key: &str, value: &RawValue) -> Result<()> {
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "my-store"
///     }
/// }
/// ```
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetches the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// - `KvError::NotFound` if the key is absent
    /// - `KvError::Transport` if the store cannot be reached or answers unexpectedly
    /// - `KvError::Decode` if the stored body is not a valid value
    async fn get_value(&self, key: &str) -> Result<RawValue>;

    /// Lists every key known to the store, in store order.
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// `KvError::WriteFailure` if the store rejected or failed the write.
    async fn put_value(&self, key: &str, value: &RawValue) -> Result<()>;

    /// Fetches every key with its value.
    ///
    /// The default implementation lists the keys and fetches them one by one.
    /// Keys removed between both calls are skipped.
    async fn get_all(&self) -> Result<IndexMap<String, RawValue>> {
        let keys = self.list_keys().await?;
        let mut values = IndexMap::with_capacity(keys.len());

        for key in keys {
            match self.get_value(&key).await {
                Ok(value) => {
                    values.insert(key, value);
                },
                Err(e) if e.is_not_found() => {
                    debug!(key = %key, "Key vanished while fetching all values");
                },
                Err(e) => return Err(e),
            }
        }

        Ok(values)
    }

    /// Returns the name of this store, used for logging.
    fn name(&self) -> &str;
}
