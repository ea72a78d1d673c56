//! Directory-backed durable key-value storage.
//!
//! Each key is stored in its own `<key>.json` file. Writes go to a temporary
//! file that is synced and then renamed over the target, under an exclusive
//! lock file, so a reader never sees a half-written value.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use mireceta_core::error::{MiRecetaError, Result};
use mireceta_core::storage::KeyValueStorage;

/// Durable storage rooted at a directory.
///
/// # Example
///
/// ```no_run
/// use mireceta_core::storage::KeyValueStorage;
/// use mireceta_infrastructure::JsonFileStorage;
///
/// let storage = JsonFileStorage::new("/tmp/mireceta").unwrap();
/// storage.set("mireceta_favorites", "[\"1\"]").unwrap();
/// assert_eq!(storage.get("mireceta_favorites").unwrap().as_deref(), Some("[\"1\"]"));
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Opens storage in `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the directory holding the value files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a key to its value file, rejecting keys that are not plain names.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(MiRecetaError::storage_unavailable(format!(
                "invalid storage key '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Gets a temporary file path next to `path` for atomic writes.
    fn temp_path(path: &Path) -> Result<PathBuf> {
        let parent = path
            .parent()
            .ok_or_else(|| MiRecetaError::io("Path has no parent directory"))?;
        let file_name = path
            .file_name()
            .ok_or_else(|| MiRecetaError::io("Path has no file name"))?;
        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let _lock = FileLock::acquire(&path)?;

        let tmp_path = Self::temp_path(&path)?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let _lock = FileLock::acquire(&path)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A file lock guard that releases the lock when dropped.
///
/// The lock file is never removed, since a waiter may still hold its inode.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    /// Acquires an exclusive lock next to `path`.
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| {
                MiRecetaError::storage_unavailable(format!("Failed to acquire lock: {}", e))
            })?;
        }

        Ok(FileLock { file })
    }
}
