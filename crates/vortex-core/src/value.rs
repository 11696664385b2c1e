//! Conversion between raw store values and typed values.
//!
//! Values travel to and from the store as JSON documents. The raw form is
//! kept as a [`RawValue`] (an alias of `serde_json::Value`) so that it can
//! be cached once and decoded into whatever type each caller asks for.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{KvError, Result};

/// Raw value as stored remotely.
pub type RawValue = serde_json::Value;

/// Decodes a raw value into `T`.
///
/// # Example
///
/// ```
/// use vortex_core::{decode, RawValue};
///
/// let raw = RawValue::Bool(true);
/// let enabled: bool = decode("feature.enabled", &raw).unwrap();
/// assert!(enabled);
///
/// assert!(decode::<u32>("feature.enabled", &raw).is_err());
/// ```
pub fn decode<T: DeserializeOwned>(key: &str, raw: &RawValue) -> Result<T> {
    T::deserialize(raw).map_err(|e| KvError::decode(key, e.to_string()))
}

/// Encodes a typed value into its raw store form.
pub fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<RawValue> {
    serde_json::to_value(value).map_err(|e| KvError::write_failure(key, e.to_string()))
}

/// Parses a raw value from a response body.
pub fn from_slice(key: &str, body: &[u8]) -> Result<RawValue> {
    serde_json::from_slice(body).map_err(|e| KvError::decode(key, e.to_string()))
}
