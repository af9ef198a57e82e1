use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;
use crate::store::KeyValueStore;

/// Load a JSON value stored under `key`. `Ok(None)` if the key is empty.
pub fn load_state<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(contents) = store.get(key)? else {
        return Ok(None);
    };
    let value: T = serde_json::from_str(&contents)?;
    Ok(Some(value))
}

/// Serialize `value` as JSON and store it under `key`.
pub fn save_state<T: Serialize + ?Sized>(
    store: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_string(value)?;
    store.set(key, &body)
}
