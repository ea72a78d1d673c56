//! Configuration service implementation.
//!
//! Loads `MiRecetaConfig` from a TOML file (by default
//! `~/.config/mireceta/config.toml`), writing a default file on first use.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use mireceta_core::config::MiRecetaConfig;
use mireceta_core::error::Result;

use crate::paths::MiRecetaPaths;

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<MiRecetaConfig>>>,
}

impl ConfigService {
    /// Creates a service for the default config file location.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(MiRecetaPaths::config_file()?))
    }

    /// Creates a service for an explicit config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration from disk, bypassing the cache.
    ///
    /// A missing file is created with default values. An unreadable or
    /// malformed file is an error.
    pub fn load(&self) -> Result<MiRecetaConfig> {
        if !self.path.exists() {
            let defaults = MiRecetaConfig::default();
            self.save(&defaults)?;
            tracing::info!("[ConfigService] Created default config at {:?}", self.path);
            return Ok(defaults);
        }

        let content = fs::read_to_string(&self.path)?;
        let config: MiRecetaConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Gets the configuration, loading it on first access.
    ///
    /// Falls back to defaults (without caching them) when the file cannot be
    /// loaded.
    pub fn get_config(&self) -> MiRecetaConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        match self.load() {
            Ok(loaded) => {
                let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
                *write_lock = Some(loaded.clone());
                loaded
            }
            Err(e) => {
                tracing::warn!(
                    "[ConfigService] Failed to load {:?}, using defaults: {}",
                    self.path,
                    e
                );
                MiRecetaConfig::default()
            }
        }
    }

    /// Writes `config` to the file and refreshes the cache.
    pub fn save(&self, config: &MiRecetaConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(config)?;
        fs::write(&self.path, text)?;

        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }
}

/// Resolves the storage directory: the configured one, or the platform default.
pub fn resolve_storage_dir(config: &MiRecetaConfig) -> Result<PathBuf> {
    match &config.storage.dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(MiRecetaPaths::storage_dir()?),
    }
}
