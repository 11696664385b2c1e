//! Cache key generation.

use std::fmt;

use vortex_core::ConfigKey;

/// Slot del namespace de cache.
///
/// Las dos keys agregadas son variantes propias, por lo que nunca pueden
/// colisionar con una key de configuracion real.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Entrada de una key de configuracion.
    Key(ConfigKey),
    /// Resultado de "listar todas las keys".
    AllKeys,
    /// Resultado de "obtener todos los valores".
    AllValues,
}

impl CacheKey {
    /// Retorna true si es una de las entradas agregadas.
    ///
    /// # Examples
    ///
    /// ```
    /// use vortex_client::cache::CacheKey;
    /// use vortex_core::ConfigKey;
    ///
    /// assert!(CacheKey::AllKeys.is_aggregate());
    /// assert!(!CacheKey::from(ConfigKey::new("a").unwrap()).is_aggregate());
    /// ```
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::AllKeys | Self::AllValues)
    }

    /// Las dos entradas agregadas, en orden de invalidacion.
    pub fn aggregates() -> [CacheKey; 2] {
        [Self::AllKeys, Self::AllValues]
    }
}

/// Entradas agregadas que acepta [`CacheLayer::read_through_aggregate`].
///
/// [`CacheLayer::read_through_aggregate`]: crate::cache::CacheLayer::read_through_aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateSlot {
    AllKeys,
    AllValues,
}

impl From<AggregateSlot> for CacheKey {
    fn from(slot: AggregateSlot) -> Self {
        match slot {
            AggregateSlot::AllKeys => Self::AllKeys,
            AggregateSlot::AllValues => Self::AllValues,
        }
    }
}

impl From<ConfigKey> for CacheKey {
    fn from(key: ConfigKey) -> Self {
        Self::Key(key)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "key:{}", key),
            Self::AllKeys => f.write_str("@all-keys"),
            Self::AllValues => f.write_str("@all-values"),
        }
    }
}
