//! Client settings loaded from files and environment variables.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use vortex_core::{KvError, Result};

use crate::cache::CacheConfig;

/// Prefijo de las variables de entorno (`VORTEX_KV__STORE__BASE_URL`, ...).
pub const ENV_PREFIX: &str = "VORTEX_KV";

/// Settings completos del cliente.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Conexion al store remoto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Base URL del endpoint KV.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout por request.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Token ACL (opcional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Cache read-through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Si es false, cada lectura va al store remoto.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Vida de cada entrada.
    #[serde(default = "default_ttl", with = "humantime_serde")]
    pub ttl: Duration,

    /// Capacidad maxima del cache en memoria.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8500/v1/kv".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_true() -> bool {
    true
}

fn default_ttl() -> Duration {
    Duration::from_millis(2000)
}

fn default_max_capacity() -> u64 {
    10_000
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            token: None,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: default_ttl(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl CacheSettings {
    /// Convierte a la configuracion de la capa de cache.
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: self.ttl,
            max_capacity: self.max_capacity,
        }
    }
}

impl ClientSettings {
    /// Carga settings desde un archivo opcional y luego desde el entorno.
    ///
    /// Las variables de entorno tienen prioridad sobre el archivo. El formato
    /// del archivo se deduce de su extension (toml, yaml, json).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(env)
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| KvError::invalid_config(format!("failed to load settings: {e}")))
    }
}

/// Fuente `VORTEX_KV__<SECCION>__<CAMPO>`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}
