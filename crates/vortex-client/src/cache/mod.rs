//! Cache module for the Vortex KV client.
//!
//! This module provides the read-through cache layer: per-key and
//! aggregate entries with lazy TTL expiry, write-triggered invalidation
//! and a pluggable storage backend (Moka by default).

pub mod entry;
pub mod keys;
pub mod layer;
pub mod store;

// Re-exports
pub use entry::CacheEntry;
pub use keys::{AggregateSlot, CacheKey};
pub use layer::{CacheConfig, CacheLayer};
pub use store::{CacheStore, MokaCacheStore, NoopCacheStore};
