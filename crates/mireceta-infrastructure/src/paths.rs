//! Platform paths for MiReceta configuration and durable state.
//!
//! ```text
//! ~/.config/mireceta/          # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/mireceta/     # Data directory
//! └── storage/                 # JsonFileStorage values (<key>.json)
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "mireceta";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
    /// The platform data directory could not be determined.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
            PathError::DataDirNotFound => write!(f, "Cannot find data directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for mireceta_core::MiRecetaError {
    fn from(err: PathError) -> Self {
        mireceta_core::MiRecetaError::config(err.to_string())
    }
}

/// Unified path management for MiReceta.
pub struct MiRecetaPaths;

impl MiRecetaPaths {
    /// Returns the MiReceta configuration directory (e.g. `~/.config/mireceta/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the MiReceta data directory (e.g. `~/.local/share/mireceta/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DataDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default directory of the durable key-value storage.
    pub fn storage_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("storage"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file() {
        let config_file = MiRecetaPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = MiRecetaPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("mireceta"));
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_storage_dir() {
        let storage_dir = MiRecetaPaths::storage_dir().unwrap();
        assert!(storage_dir.ends_with("storage"));
        let data_dir = MiRecetaPaths::data_dir().unwrap();
        assert!(storage_dir.starts_with(&data_dir));
    }
}
