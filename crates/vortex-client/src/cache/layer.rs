//! Read-through cache layer over a remote key-value store.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use vortex_core::{ConfigKey, KvError, RawValue, Result, decode};
use vortex_kv::KvStore;

use crate::cache::entry::CacheEntry;
use crate::cache::keys::{AggregateSlot, CacheKey};
use crate::cache::store::{CacheStore, MokaCacheStore, NoopCacheStore};
use crate::metrics::CacheMetrics;

/// Configuracion del cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL de cada entrada (default: 2000 ms)
    pub ttl: Duration,
    /// Maximo numero de entries del store por defecto (default: 10000)
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_millis(2000),
            max_capacity: 10_000,
        }
    }
}

/// Capa de cache read-through con TTL entre los callers y el store remoto.
///
/// - Las lecturas devuelven la entrada fresca si existe; si no, consultan el
///   store y cachean solo resultados exitosos (sin cache negativo).
/// - Las escrituras van primero al store; solo si tienen exito se reemplaza
///   la entrada de la key y se invalidan las dos entradas agregadas.
/// - Los errores de lectura nunca se propagan: se loguean y el caller recibe
///   `None` (su valor por defecto).
///
/// Fetches concurrentes de la misma key expirada no se coalescen. Un fetch
/// que se solapa con una escritura de su slot no se cachea.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vortex_client::cache::{CacheConfig, CacheLayer};
/// use vortex_core::ConfigKey;
/// use vortex_kv::MemoryKvStore;
///
/// # #[tokio::main]
/// # async fn main() {
/// let layer = CacheLayer::new(Arc::new(MemoryKvStore::new()), CacheConfig::default());
/// let key = ConfigKey::new("feature.enabled").unwrap();
///
/// layer.write_through(&key, serde_json::json!(true)).await.unwrap();
/// assert_eq!(layer.read_through::<bool>(&key).await, Some(true));
/// # }
/// ```
#[derive(Clone)]
pub struct CacheLayer {
    remote: Arc<dyn KvStore>,
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    metrics: CacheMetrics,
    epochs: Arc<WriteEpochs>,
}

/// Contadores de escrituras por slot.
///
/// Cada escritura incrementa el epoch de su key y el de los agregados. Un
/// fetch solo puede cachear su resultado si el epoch de su slot no cambio
/// mientras estaba en vuelo.
#[derive(Debug, Default)]
struct WriteEpochs {
    aggregates: AtomicU64,
    keys: Mutex<HashMap<ConfigKey, u64>>,
}

impl WriteEpochs {
    fn current(&self, slot: &CacheKey) -> u64 {
        match slot {
            CacheKey::Key(key) => self.keys.lock().get(key).copied().unwrap_or(0),
            CacheKey::AllKeys | CacheKey::AllValues => self.aggregates.load(Ordering::SeqCst),
        }
    }

    fn bump(&self, key: &ConfigKey) {
        *self.keys.lock().entry(key.clone()).or_insert(0) += 1;
        self.aggregates.fetch_add(1, Ordering::SeqCst);
    }
}

impl CacheLayer {
    /// Crea la capa con el store Moka por defecto.
    pub fn new(remote: Arc<dyn KvStore>, config: CacheConfig) -> Self {
        let metrics = CacheMetrics::new();
        let store = MokaCacheStore::with_metrics(config.max_capacity, metrics.clone());
        Self::with_parts(remote, Arc::new(store), config.ttl, metrics)
    }

    /// Crea la capa sobre un cache store inyectado.
    pub fn with_store(remote: Arc<dyn KvStore>, store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self::with_parts(remote, store, ttl, CacheMetrics::new())
    }

    /// Crea una capa sin cache: cada operacion llega al store remoto.
    pub fn uncached(remote: Arc<dyn KvStore>) -> Self {
        Self::with_store(remote, Arc::new(NoopCacheStore), Duration::ZERO)
    }

    fn with_parts(
        remote: Arc<dyn KvStore>,
        store: Arc<dyn CacheStore>,
        ttl: Duration,
        metrics: CacheMetrics,
    ) -> Self {
        debug!(
            remote = remote.name(),
            cache_store = store.name(),
            ttl_ms = ttl.as_millis() as u64,
            "Cache layer created"
        );
        Self {
            remote,
            store,
            ttl,
            metrics,
            epochs: Arc::new(WriteEpochs::default()),
        }
    }

    /// Lee `key` a traves del cache y lo decodifica como `T`.
    ///
    /// Retorna `None` si la key no existe, si el store falla o si el valor no
    /// puede decodificarse; en ningun caso se cachea el fallo.
    pub async fn read_through<T: DeserializeOwned>(&self, key: &ConfigKey) -> Option<T> {
        let remote = Arc::clone(&self.remote);
        let name = key.as_str();
        self.read_through_with(CacheKey::from(key.clone()), || async move {
            remote.get_value(name).await
        })
        .await
    }

    /// Igual que [`read_through`](Self::read_through) pero para una entrada
    /// agregada, usando `fetch` como operacion remota.
    ///
    pub async fn read_through_aggregate<T, F, Fut>(&self, slot: AggregateSlot, fetch: F) -> Option<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RawValue>>,
    {
        self.read_through_with(CacheKey::from(slot), fetch).await
    }

    /// Lista todas las keys a traves de la entrada agregada `AllKeys`.
    pub async fn all_keys(&self) -> Option<Vec<String>> {
        let remote = Arc::clone(&self.remote);
        self.read_through_aggregate(AggregateSlot::AllKeys, || async move {
            let keys = remote.list_keys().await?;
            Ok(RawValue::from(keys))
        })
        .await
    }

    /// Obtiene todos los valores a traves de la entrada agregada `AllValues`.
    pub async fn all_values(&self) -> Option<IndexMap<String, RawValue>> {
        let remote = Arc::clone(&self.remote);
        self.read_through_aggregate(AggregateSlot::AllValues, || async move {
            let values = remote.get_all().await?;
            Ok(RawValue::Object(values.into_iter().collect()))
        })
        .await
    }

    /// Escribe `value` en el store remoto y, si tiene exito, actualiza el cache.
    ///
    /// Un valor `null` no se cachea: la entrada de la key se elimina, igual que
    /// haria una lectura que encuentra `null` en el remoto.
    ///
    /// # Errors
    ///
    /// `KvError::WriteFailure` si el store rechaza o falla la escritura. En ese
    /// caso el cache no se modifica.
    pub async fn write_through(&self, key: &ConfigKey, value: RawValue) -> Result<()> {
        let start = Instant::now();

        if let Err(e) = self.remote.put_value(key.as_str(), &value).await {
            let e = e.into_write_failure(key.as_str());
            self.metrics.record_write_failure();
            warn!(key = %key, error = %e, "Write failed, cache left untouched");
            return Err(e);
        }

        // El epoch sube antes de tocar el cache para descartar fetches en vuelo.
        self.epochs.bump(key);

        let slot = CacheKey::from(key.clone());
        if value.is_null() {
            self.store.remove(&slot).await;
        } else {
            self.store
                .insert(slot, CacheEntry::new(value, self.ttl))
                .await;
        }
        for aggregate in CacheKey::aggregates() {
            self.store.remove(&aggregate).await;
        }
        self.metrics.record_invalidation(2);

        debug!(key = %key, "Write stored, aggregate entries invalidated");
        self.metrics
            .record_operation_duration("write_through", start.elapsed());
        self.update_entry_gauge();

        Ok(())
    }

    /// Retorna true si un `read_through` de `key` produce un valor no nulo.
    ///
    /// Comparte el camino cacheado, por lo que es eventualmente consistente con
    /// borrados hechos por otros clientes dentro de la ventana del TTL.
    pub async fn exists(&self, key: &ConfigKey) -> bool {
        self.read_through::<RawValue>(key)
            .await
            .is_some_and(|value| !value.is_null())
    }

    /// Invalida la entrada de una key especifica.
    pub async fn invalidate(&self, key: &ConfigKey) {
        self.store.remove(&CacheKey::from(key.clone())).await;
        debug!(key = %key, "Cache entry invalidated");
    }

    /// Invalida todas las entradas.
    pub async fn clear(&self) {
        self.store.clear().await;
        debug!("Cache cleared");
    }

    /// TTL aplicado a nuevas entradas.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Retorna el store remoto.
    pub fn remote(&self) -> &Arc<dyn KvStore> {
        &self.remote
    }

    async fn read_through_with<T, F, Fut>(&self, slot: CacheKey, fetch: F) -> Option<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RawValue>>,
    {
        let start = Instant::now();

        if let Some(entry) = self.store.get(&slot).await {
            if !entry.is_expired() {
                self.metrics.record_hit();
                self.metrics
                    .record_operation_duration("read_hit", start.elapsed());
                return self.decode_cached(&slot, entry.value());
            }
            self.metrics.record_expired();
            debug!(key = %slot, "Cache entry expired");
        }

        self.metrics.record_miss();
        let epoch = self.epochs.current(&slot);

        // Nada se inserta antes de que el fetch termine: si el future se
        // cancela, el cache queda intacto.
        let result = fetch().await;
        let value = match result {
            Ok(RawValue::Null) => {
                debug!(key = %slot, "Remote returned null, not cached");
                return None;
            },
            Ok(raw) => raw,
            Err(KvError::NotFound { .. }) => {
                self.metrics.record_fetch_error("not_found");
                debug!(key = %slot, "Key not found remotely, not cached");
                return None;
            },
            Err(e) => {
                self.metrics.record_fetch_error(error_kind(&e));
                warn!(key = %slot, error = %e, "Remote fetch failed, returning default");
                return None;
            },
        };

        let typed = match decode::<T>(&slot.to_string(), &value) {
            Ok(typed) => typed,
            Err(e) => {
                self.metrics.record_fetch_error("decode");
                warn!(key = %slot, error = %e, "Fetched value could not be decoded, not cached");
                return None;
            },
        };

        if self.epochs.current(&slot) != epoch {
            debug!(key = %slot, "Write overlapped fetch, result not cached");
            return Some(typed);
        }
        self.store
            .insert(slot.clone(), CacheEntry::new(value, self.ttl))
            .await;
        // Una escritura entre el chequeo y el insert deja el slot vacio, nunca viejo.
        if self.epochs.current(&slot) != epoch {
            self.store.remove(&slot).await;
        }
        self.metrics
            .record_operation_duration("read_miss", start.elapsed());
        self.update_entry_gauge();

        Some(typed)
    }

    fn decode_cached<T: DeserializeOwned>(&self, slot: &CacheKey, value: &RawValue) -> Option<T> {
        match decode::<T>(&slot.to_string(), value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                warn!(key = %slot, error = %e, "Cached value does not match requested type");
                None
            },
        }
    }

    /// Actualiza el gauge de entry count.
    fn update_entry_gauge(&self) {
        self.metrics.update_entry_count(self.store.entry_count());
    }
}

fn error_kind(error: &KvError) -> &'static str {
    match error {
        KvError::NotFound { .. } => "not_found",
        KvError::Transport { .. } => "transport",
        KvError::Decode { .. } => "decode",
        _ => "other",
    }
}

impl std::fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("remote", &self.remote.name())
            .field("store", &self.store.name())
            .field("ttl", &self.ttl)
            .finish()
    }
}
