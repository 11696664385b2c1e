//! Cache entries with lazy TTL expiry.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use vortex_core::RawValue;

/// Valor cacheado junto con su momento de insercion y su TTL.
///
/// El TTL se fija al insertar y nunca se extiende en lecturas posteriores.
/// La expiracion se evalua al leer, no hay barrido proactivo.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: Arc<RawValue>,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Crea una entrada insertada ahora.
    pub fn new(value: impl Into<Arc<RawValue>>, ttl: Duration) -> Self {
        Self {
            value: value.into(),
            inserted_at: Instant::now(),
            ttl,
        }
    }

    /// Retorna el valor cacheado.
    pub fn value(&self) -> &Arc<RawValue> {
        &self.value
    }

    /// Momento de insercion.
    pub fn inserted_at(&self) -> Instant {
        self.inserted_at
    }

    /// TTL de la entrada.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Edad de la entrada respecto de `now`.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    /// Expirada una vez que `now - inserted_at > ttl`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.age_at(now) > self.ttl
    }

    /// Expirada respecto del reloj actual.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
