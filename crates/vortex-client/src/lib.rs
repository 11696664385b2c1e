//! Vortex Client - cached configuration access for remote KV stores
//!
//! This crate provides the typed [`ConfigClient`] facade and the
//! read-through [`cache`] layer that sits between callers and any
//! [`vortex_kv::KvStore`].

pub mod cache;
pub mod client;
pub mod metrics;
pub mod settings;

pub use cache::{CacheConfig, CacheLayer};
pub use client::ConfigClient;
pub use settings::ClientSettings;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
