use std::collections::HashMap;

use serde_json::json;
use vortex_core::{ConfigKey, KvError, Result, decode, encode};

#[test]
fn test_key_validation_workflow() {
    fn validate_and_process(raw: &str) -> Result<String> {
        let key = ConfigKey::new(raw)?;
        Ok(format!("Processed: {}", key))
    }

    // Valid case
    assert_eq!(
        validate_and_process("service/db.url").unwrap(),
        "Processed: service/db.url"
    );

    // Invalid case
    let result = validate_and_process("");
    if let Err(KvError::InvalidKey(reason)) = result {
        assert!(reason.contains("empty"));
    } else {
        panic!("Expected InvalidKey error");
    }
}

#[test]
fn test_typed_value_workflow() {
    // 1. Encode typed values the way a writer would
    let flags = encode("flags", &vec!["beta", "new-ui"]).unwrap();
    let labels = encode("labels", &HashMap::from([("team", "core")])).unwrap();

    // 2. Decode them back into the requested types
    let flags: Vec<String> = decode("flags", &flags).unwrap();
    assert_eq!(flags, vec!["beta", "new-ui"]);

    let labels: HashMap<String, String> = decode("labels", &labels).unwrap();
    assert_eq!(labels["team"], "core");

    // 3. A value of the wrong shape is a decode error, not a panic
    let err = decode::<Vec<String>>("labels", &json!({"team": "core"})).unwrap_err();
    assert!(err.is_decode_error());
}

#[test]
fn test_error_context_preservation() {
    let error = KvError::write_failure("feature.enabled", "store returned false");
    let message = error.to_string();

    assert!(message.contains("feature.enabled"));
    assert!(message.contains("store returned false"));
    assert!(!error.is_transient());
}
