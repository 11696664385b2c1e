//! Configuration key newtype.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KvError, Result};

/// Identifier of a configuration entry in the remote store.
///
/// Keys are non-empty and are kept verbatim: the store is case sensitive,
/// so no normalization is applied.
///
/// # Example
///
/// ```
/// use vortex_core::ConfigKey;
///
/// let key = ConfigKey::new("feature.enabled").unwrap();
/// assert_eq!(key.as_str(), "feature.enabled");
///
/// assert!(ConfigKey::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new key, rejecting empty or whitespace-only identifiers.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(KvError::invalid_key("configuration key cannot be empty"));
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ConfigKey {
    type Err = KvError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ConfigKey {
    type Error = KvError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ConfigKey {
    type Error = KvError;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_kept_verbatim() {
        let key = ConfigKey::new("Service/DB.Url").unwrap();
        assert_eq!(key.as_str(), "Service/DB.Url");
        assert_eq!(key.to_string(), "Service/DB.Url");
    }

    #[test]
    fn test_empty_keys_are_rejected() {
        for raw in ["", "   ", "\t\n"] {
            let err = ConfigKey::new(raw).unwrap_err();
            assert!(matches!(err, KvError::InvalidKey(_)));
        }
    }

    #[test]
    fn test_parse_and_serde() {
        let key: ConfigKey = "feature.enabled".parse().unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"feature.enabled\"");

        let back: ConfigKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);

        assert!(serde_json::from_str::<ConfigKey>("\"\"").is_err());
    }
}
