//! Vortex Core - Domain types and errors
//!
//! This crate provides the foundational types shared by the Vortex KV
//! store transports and the caching configuration client:
//!
//! - [`ConfigKey`]: validated configuration key
//! - [`KvError`]: error taxonomy for reads and writes against the store
//! - [`value`]: conversion between raw store values and typed values

pub mod error;
pub mod key;
pub mod value;

pub use error::{KvError, Result};
pub use key::ConfigKey;
pub use value::{RawValue, decode, encode};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
