//! # Vortex KV Stores
//!
//! Remote key-value store transports for the Vortex KV configuration client.
//!
//! This crate defines the [`KvStore`] capability consumed by the caching
//! client and ships two implementations.
//!
//! ## Features
//!
//! - Async trait-based store abstraction (point get, key listing, put)
//! - Consul-style HTTP transport with request/response interceptors
//! - In-process store for local development and tests
//!
//! ## Example
//!
//! ```ignore
//! use vortex_kv::{HttpKvStore, HttpStoreConfig, KvStore};
//!
//! let config = HttpStoreConfig::builder()
//!     .base_url("http://127.0.0.1:8500/v1/kv")
//!     .token("acl-token")
//!     .build()?;
//!
//! let store = HttpKvStore::new(config)?;
//! let value = store.get_value("feature.enabled").await?;
//! ```

pub mod http;
pub mod store;

// Re-exports
pub use http::{HeaderInterceptor, HttpKvStore, HttpStoreConfig, Interceptor};
pub use store::{KvStore, MemoryKvStore};

// Re-export vortex_core for consumers
pub use vortex_core;
