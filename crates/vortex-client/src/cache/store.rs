//! Pluggable cache storage.

use async_trait::async_trait;
use moka::future::Cache;

use crate::cache::entry::CacheEntry;
use crate::cache::keys::CacheKey;
use crate::metrics::CacheMetrics;

/// Almacenamiento key → entry usado por la capa de cache.
///
/// El store solo guarda y devuelve entradas; la expiracion por TTL la decide
/// la capa de cache al leer. Las implementaciones deben tolerar accesos
/// concurrentes desde cualquier cantidad de tareas.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Retorna la entrada guardada, expirada o no.
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Inserta o reemplaza la entrada.
    async fn insert(&self, key: CacheKey, entry: CacheEntry);

    /// Elimina la entrada si existe.
    async fn remove(&self, key: &CacheKey);

    /// Elimina todas las entradas.
    async fn clear(&self);

    /// Numero aproximado de entradas.
    fn entry_count(&self) -> u64;

    /// Nombre para logging.
    fn name(&self) -> &str;
}

/// Cache store en memoria usando Moka.
/// Thread-safe y async-friendly.
#[derive(Clone)]
pub struct MokaCacheStore {
    inner: Cache<CacheKey, CacheEntry>,
}

impl MokaCacheStore {
    /// Crea un store con la capacidad maxima dada.
    pub fn new(max_capacity: u64) -> Self {
        Self::with_metrics(max_capacity, CacheMetrics::new())
    }

    /// Crea un store que reporta sus evictions en `metrics`.
    pub fn with_metrics(max_capacity: u64, metrics: CacheMetrics) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .eviction_listener(move |_key, _value, cause| {
                let reason = match cause {
                    moka::notification::RemovalCause::Expired => "ttl",
                    moka::notification::RemovalCause::Size => "capacity",
                    moka::notification::RemovalCause::Explicit => "manual",
                    moka::notification::RemovalCause::Replaced => "replaced",
                };
                metrics.record_eviction(reason);
            })
            .build();

        Self { inner }
    }

    /// Procesa tareas pendientes de Moka (para tests principalmente).
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl Default for MokaCacheStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.inner.get(key).await
    }

    async fn insert(&self, key: CacheKey, entry: CacheEntry) {
        self.inner.insert(key, entry).await;
    }

    async fn remove(&self, key: &CacheKey) {
        self.inner.invalidate(key).await;
    }

    async fn clear(&self) {
        self.inner.invalidate_all();
    }

    fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    fn name(&self) -> &str {
        "moka"
    }
}

impl std::fmt::Debug for MokaCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheStore")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

/// Store que no guarda nada: cada lectura va al store remoto.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCacheStore;

#[async_trait]
impl CacheStore for NoopCacheStore {
    async fn get(&self, _key: &CacheKey) -> Option<CacheEntry> {
        None
    }

    async fn insert(&self, _key: CacheKey, _entry: CacheEntry) {}

    async fn remove(&self, _key: &CacheKey) {}

    async fn clear(&self) {}

    fn entry_count(&self) -> u64 {
        0
    }

    fn name(&self) -> &str {
        "noop"
    }
}
