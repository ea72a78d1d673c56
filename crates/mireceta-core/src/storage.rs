//! Durable key-value storage capability.
//!
//! The stores never detect their execution environment. They are handed a
//! `KeyValueStorage` at construction; contexts without durable storage pass a
//! no-op implementation whose `is_available` returns false.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// A string-keyed store of string values that survives reloads.
///
/// Writes are synchronous: a successful `set` is visible to the next `get` on
/// the same instance.
pub trait KeyValueStorage: Send + Sync {
    /// Returns false for stand-ins that persist nothing.
    fn is_available(&self) -> bool {
        true
    }

    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Value found
    /// - `Ok(None)`: Nothing stored under `key`
    /// - `Err(_)`: The storage could not be read
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSON helpers available on every [`KeyValueStorage`], including trait objects.
pub trait JsonStorageExt {
    /// Reads and deserializes the JSON value stored under `key`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;

    /// Serializes `value` as JSON and stores it under `key`.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> JsonStorageExt for S {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStorage {
        entries: Mutex<HashMap<String, String>>,
    }

    impl KeyValueStorage for MapStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[test]
    fn test_json_helpers_on_trait_object() {
        let storage: Box<dyn KeyValueStorage> = Box::new(MapStorage::default());
        assert!(storage.is_available());

        storage.set_json("ids", &vec!["1", "2"]).unwrap();
        let ids: Option<Vec<String>> = storage.get_json("ids").unwrap();
        assert_eq!(ids, Some(vec!["1".to_string(), "2".to_string()]));

        let missing: Option<Vec<String>> = storage.get_json("missing").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_get_json_reports_corrupt_values() {
        let storage = MapStorage::default();
        storage.set("ids", "not json").unwrap();
        let err = storage.get_json::<Vec<String>>("ids").unwrap_err();
        assert!(err.is_serialization());
    }
}
