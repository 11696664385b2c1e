//! Cache metrics recording.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las descripciones de las metricas de cache.
/// Llamar una vez al inicio, despues de instalar un recorder.
pub fn register_cache_metrics() {
    metrics::describe_counter!("vortex_kv_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!(
        "vortex_kv_cache_misses_total",
        "Total number of cache misses (absent or expired)"
    );
    metrics::describe_counter!(
        "vortex_kv_cache_expired_total",
        "Entries found logically expired at read time"
    );
    metrics::describe_counter!(
        "vortex_kv_remote_fetch_errors_total",
        "Remote fetches that resolved to the default value"
    );
    metrics::describe_counter!(
        "vortex_kv_cache_invalidations_total",
        "Aggregate entries invalidated by writes"
    );
    metrics::describe_counter!(
        "vortex_kv_write_failures_total",
        "Writes rejected or failed by the remote store"
    );
    metrics::describe_counter!(
        "vortex_kv_cache_evictions_total",
        "Total number of cache evictions"
    );
    metrics::describe_gauge!(
        "vortex_kv_cache_entries",
        "Current number of entries in cache"
    );
    metrics::describe_histogram!(
        "vortex_kv_cache_operation_seconds",
        "Time spent on cache operations"
    );
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos para maximo rendimiento.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    fetch_errors: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("vortex_kv_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("vortex_kv_cache_misses_total").increment(1);
    }

    /// Registra una entrada encontrada expirada
    pub fn record_expired(&self) {
        counter!("vortex_kv_cache_expired_total").increment(1);
    }

    /// Registra un fetch remoto que termino en el valor por defecto
    pub fn record_fetch_error(&self, kind: &'static str) {
        self.fetch_errors.fetch_add(1, Ordering::Relaxed);
        counter!("vortex_kv_remote_fetch_errors_total", "kind" => kind).increment(1);
    }

    /// Registra invalidaciones de entradas agregadas
    pub fn record_invalidation(&self, count: u64) {
        counter!("vortex_kv_cache_invalidations_total").increment(count);
    }

    /// Registra una escritura fallida
    pub fn record_write_failure(&self) {
        counter!("vortex_kv_write_failures_total").increment(1);
    }

    /// Registra una eviction
    pub fn record_eviction(&self, reason: &'static str) {
        counter!("vortex_kv_cache_evictions_total", "reason" => reason).increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: u64) {
        gauge!("vortex_kv_cache_entries").set(count as f64);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("vortex_kv_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let misses = self.misses.load(Ordering::Relaxed) as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de fetches fallidos
    pub fn fetch_errors(&self) -> u64 {
        self.fetch_errors.load(Ordering::Relaxed)
    }
}
