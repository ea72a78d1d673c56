//! Stand-in for contexts without durable storage.

use mireceta_core::error::Result;
use mireceta_core::storage::KeyValueStorage;

/// Storage that keeps nothing.
///
/// Reads always come back empty and writes are accepted and dropped, so the
/// stores run normally on in-memory state only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStorage;

impl KeyValueStorage for NoopStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
