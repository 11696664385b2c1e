//! Key-value store abstraction.
//!
//! This module defines the trait implemented by every store transport and
//! the in-process implementation.

mod memory;
mod traits;

pub use memory::MemoryKvStore;
pub use traits::KvStore;
