//! Composition root: builds the stores from configuration and wires them up.

use std::sync::Arc;

use anyhow::{Context, Result};
use mireceta_core::MiRecetaConfig;
use mireceta_core::storage::KeyValueStorage;
use mireceta_infrastructure::{ConfigService, JsonFileStorage, resolve_storage_dir};
use tokio::task::JoinHandle;

use crate::catalog::CatalogStore;
use crate::logging::init_tracing;
use crate::route::RouteGuard;
use crate::session::SessionStore;

/// Shared handles to everything a view needs.
///
/// Both stores read the same storage instance; the route guard shares the
/// session store.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: MiRecetaConfig,
    pub catalog: Arc<CatalogStore>,
    pub session: Arc<SessionStore>,
    pub guard: RouteGuard,
}

impl AppContext {
    /// Builds the context on an explicit storage backend.
    pub fn with_storage(config: MiRecetaConfig, storage: Arc<dyn KeyValueStorage>) -> Self {
        let keys = config.storage.keys.clone();

        let catalog = Arc::new(CatalogStore::new(
            storage.clone(),
            keys.clone(),
            &config.catalog,
        ));
        let session = Arc::new(SessionStore::new(
            storage,
            keys.user,
            config.session.clone(),
        ));
        let guard = RouteGuard::new(session.clone());

        Self {
            config,
            catalog,
            session,
            guard,
        }
    }

    /// Builds the context on file-backed storage in the configured directory.
    ///
    /// Also installs the tracing subscriber at the configured log level,
    /// unless one is already installed.
    pub fn bootstrap(config: MiRecetaConfig) -> Result<Self> {
        if init_tracing(&config.logging.level) {
            tracing::debug!("[Bootstrap] Logging at level {}", config.logging.level);
        }

        let dir = resolve_storage_dir(&config).context("Failed to resolve storage directory")?;
        let storage = JsonFileStorage::new(dir.clone())
            .with_context(|| format!("Failed to open storage at {:?}", dir))?;

        tracing::info!("[Bootstrap] Using storage at {:?}", dir);
        Ok(Self::with_storage(config, Arc::new(storage)))
    }

    /// Loads the configuration through `service`, then bootstraps.
    pub fn from_config_service(service: &ConfigService) -> Result<Self> {
        Self::bootstrap(service.get_config())
    }

    /// Starts session initialization in the background.
    pub fn start(&self) -> JoinHandle<()> {
        self.session.spawn_initialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mireceta_infrastructure::MemoryStorage;
    use tempfile::TempDir;

    #[tokio::test(start_paused = true)]
    async fn test_with_storage_shares_backend() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = AppContext::with_storage(MiRecetaConfig::default(), storage.clone());

        assert_eq!(ctx.catalog.list_all().len(), 3);
        ctx.start().await.unwrap();
        ctx.session.login("ana", "ana@example.com").await;

        // Recipes and user
        assert_eq!(storage.len(), 2);
        assert!(ctx.guard.admit(&crate::route::Route::Search).await.is_allowed());
    }

    #[test]
    fn test_bootstrap_uses_configured_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = MiRecetaConfig::default();
        config.storage.dir = Some(temp_dir.path().join("store"));

        let ctx = AppContext::bootstrap(config).unwrap();

        // A subscriber is in place after bootstrap
        assert!(!init_tracing("info"));
        assert_eq!(ctx.catalog.list_all().len(), 3);
        let recipes_file = temp_dir.path().join("store").join("mireceta_recipes.json");
        assert!(recipes_file.exists());
    }

    #[test]
    fn test_from_config_service() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let storage_dir = temp_dir.path().join("data");
        std::fs::write(
            &config_path,
            format!(
                "[storage]\ndir = {:?}\n\n[catalog]\nseed_samples = false\n",
                storage_dir.to_string_lossy()
            ),
        )
        .unwrap();

        let service = ConfigService::with_path(&config_path);
        let ctx = AppContext::from_config_service(&service).unwrap();

        assert!(ctx.catalog.list_all().is_empty());
        assert_eq!(ctx.config.storage.dir, Some(storage_dir));
    }
}
