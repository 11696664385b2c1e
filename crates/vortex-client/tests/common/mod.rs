#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use vortex_client::cache::{CacheEntry, CacheKey, CacheStore};
use vortex_core::{KvError, RawValue, Result};
use vortex_kv::{KvStore, MemoryKvStore};

/// KvStore double that counts remote calls and can inject failures.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryKvStore,
    pub gets: AtomicUsize,
    pub lists: AtomicUsize,
    pub puts: AtomicUsize,
    /// Reads answer with a transport error while set.
    pub fail_reads: AtomicBool,
    /// Writes are rejected while set.
    pub reject_writes: AtomicBool,
    /// Delay applied to every read.
    pub read_delay: Mutex<Option<Duration>>,
    /// Delay applied after a read took its snapshot, before answering.
    pub settle_delay: Mutex<Option<Duration>>,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_entries<I, K>(entries: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (K, RawValue)>,
        K: Into<String>,
    {
        Arc::new(Self {
            inner: MemoryKvStore::with_entries(entries),
            ..Default::default()
        })
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    async fn before_read(&self) -> Result<()> {
        let delay = *self.read_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KvError::transport("connection refused", None));
        }
        Ok(())
    }

    async fn settle(&self) {
        let delay = *self.settle_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl KvStore for CountingStore {
    async fn get_value(&self, key: &str) -> Result<RawValue> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        let value = self.inner.get_value(key).await;
        self.settle().await;
        value
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        let keys = self.inner.list_keys().await;
        self.settle().await;
        keys
    }

    async fn put_value(&self, key: &str, value: &RawValue) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(KvError::write_failure(key, "store returned false"));
        }
        self.inner.put_value(key, value).await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Minimal injected cache store, to check the layer only relies on the trait.
#[derive(Default)]
pub struct HashMapCacheStore {
    pub entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl HashMapCacheStore {
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn snapshot(&self) -> IndexMap<String, CacheEntry> {
        self.entries
            .lock()
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

#[async_trait]
impl CacheStore for HashMapCacheStore {
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.lock().get(key).cloned()
    }

    async fn insert(&self, key: CacheKey, entry: CacheEntry) {
        self.entries.lock().insert(key, entry);
    }

    async fn remove(&self, key: &CacheKey) {
        self.entries.lock().remove(key);
    }

    async fn clear(&self) {
        self.entries.lock().clear();
    }

    fn entry_count(&self) -> u64 {
        self.entries.lock().len() as u64
    }

    fn name(&self) -> &str {
        "hashmap"
    }
}
