//! In-memory storage, lost when the process exits.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use mireceta_core::error::Result;
use mireceta_core::storage::KeyValueStorage;

/// Volatile key-value storage for tests and throwaway sessions.
///
/// Share it behind an `Arc` to simulate a reload: a store rebuilt on the same
/// instance sees everything written before.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mireceta_core::storage::JsonStorageExt;

    #[test]
    fn test_read_after_write() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage.set_json("mireceta_favorites", &["1", "3"]).unwrap();
        let ids: Vec<String> = storage.get_json("mireceta_favorites").unwrap().unwrap();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(storage.len(), 1);

        storage.remove("mireceta_favorites").unwrap();
        assert!(storage.get("mireceta_favorites").unwrap().is_none());
    }
}
