//! Error types for Vortex KV.
//!
//! This module defines the error taxonomy shared by the store
//! transports and the caching client. All errors implement the
//! standard `std::error::Error` trait via `thiserror`.
//!
//! # Error Handling Philosophy
//!
//! Reads and writes are treated asymmetrically:
//! - On the read path every error kind (`NotFound`, `Transport`, `Decode`)
//!   is resolved by the client to the caller's default and logged
//! - On the write path `WriteFailure` is always returned to the caller
//!
//! # Example
//!
//! ```
//! use vortex_core::{KvError, Result};
//!
//! fn lookup(key: &str) -> Result<String> {
//!     if key.is_empty() {
//!         return Err(KvError::invalid_key("key cannot be empty"));
//!     }
//!     Err(KvError::not_found(key))
//! }
//!
//! match lookup("feature.enabled") {
//!     Ok(value) => println!("Got value: {}", value),
//!     Err(e) if e.is_not_found() => println!("Missing"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Main error type for Vortex KV operations.
///
/// # Example
///
/// ```
/// use vortex_core::KvError;
///
/// let error = KvError::transport("connection refused", None);
/// assert!(error.is_transient());
/// assert!(!error.is_not_found());
/// ```
#[derive(Debug, Error)]
pub enum KvError {
    /// The key is absent from the remote store.
    #[error("key not found: '{key}'")]
    NotFound {
        /// The key that was requested
        key: String,
    },

    /// Network failure or unexpected status from the remote store.
    #[error(
        "transport error{}: {message}",
        status.map(|s| format!(" (status {s})")).unwrap_or_default()
    )]
    Transport {
        /// Description of what went wrong
        message: String,
        /// HTTP status, when the store answered at all
        status: Option<u16>,
    },

    /// The value exists but cannot be converted to the requested type.
    #[error("failed to decode value for '{key}': {reason}")]
    Decode {
        /// Key whose value failed to decode
        key: String,
        /// Decoder message
        reason: String,
    },

    /// The remote store rejected or failed the write.
    #[error("write failed for '{key}': {reason}")]
    WriteFailure {
        /// Key that was being written
        key: String,
        /// Why the write failed
        reason: String,
    },

    /// The key is not a valid configuration key.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Invalid client or transport configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl KvError {
    // ============================================
    // Convenience constructors
    // ============================================

    /// Creates a NotFound error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a Transport error.
    pub fn transport(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Transport {
            message: message.into(),
            status,
        }
    }

    /// Creates a Decode error.
    pub fn decode(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates a WriteFailure error.
    pub fn write_failure(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteFailure {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidKey error.
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey(reason.into())
    }

    /// Creates an InvalidConfig error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Converts any failure of a write attempt into a `WriteFailure` for `key`.
    ///
    /// Errors that already are write failures are returned unchanged.
    pub fn into_write_failure(self, key: &str) -> Self {
        match self {
            Self::WriteFailure { .. } => self,
            other => Self::write_failure(key, other.to_string()),
        }
    }

    // ============================================
    // Query methods
    // ============================================

    /// Returns true if the key was absent remotely.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a decode error.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns true if this is a write failure.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::WriteFailure { .. })
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { status, .. } => status.is_none_or(|s| s >= 500 || s == 429),
            _ => false,
        }
    }
}

/// Type alias for Results with KvError.
pub type Result<T> = std::result::Result<T, KvError>;
