//! In-process key-value store.

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use vortex_core::{KvError, RawValue, Result};

use super::KvStore;

/// A `KvStore` kept entirely in memory.
///
/// Keys are listed in insertion order. Useful for local development,
/// benchmarks and as a stand-in for the remote store in tests.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<IndexMap<String, RawValue>>,
}

impl MemoryKvStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, RawValue)>,
        K: Into<String>,
    {
        Self {
            entries: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Removes `key`, returning its previous value.
    ///
    /// This bypasses any client cache, like a deletion made by another process.
    pub fn remove(&self, key: &str) -> Option<RawValue> {
        self.entries.write().shift_remove(key)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get_value(&self, key: &str) -> Result<RawValue> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| KvError::not_found(key))
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    async fn put_value(&self, key: &str, value: &RawValue) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn get_all(&self) -> Result<IndexMap<String, RawValue>> {
        Ok(self.entries.read().clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
