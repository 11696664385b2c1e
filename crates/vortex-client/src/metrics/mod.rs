//! Metrics module for the Vortex KV client.

pub mod cache;

pub use cache::{CacheMetrics, register_cache_metrics};
