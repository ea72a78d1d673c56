//! Application configuration model.
//!
//! Every section and field has a default, so a partial (or empty) TOML file
//! deserializes into a complete configuration.
//!
//! ```toml
//! [storage]
//! dir = "/var/lib/mireceta"
//!
//! [storage.keys]
//! recipes = "mireceta_recipes"
//!
//! [session]
//! check_delay_ms = 100
//! login_delay_ms = 1000
//!
//! [catalog]
//! seed_samples = true
//!
//! [logging]
//! level = "info"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiRecetaConfig {
    pub storage: StorageSettings,
    pub session: SessionSettings,
    pub catalog: CatalogSettings,
    pub logging: LoggingSettings,
}

/// Where and under which keys state is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory for the durable store. `None` uses the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub keys: StorageKeys,
}

/// Keys of the three persisted entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub recipes: String,
    pub favorites: String,
    pub user: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            recipes: "mireceta_recipes".to_string(),
            favorites: "mireceta_favorites".to_string(),
            user: "mireceta_user".to_string(),
        }
    }
}

/// Artificial delays of the session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Delay before the persisted identity is read at startup
    pub check_delay_ms: u64,
    /// Delay before a login completes
    pub login_delay_ms: u64,
}

impl SessionSettings {
    pub fn check_delay(&self) -> Duration {
        Duration::from_millis(self.check_delay_ms)
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    /// Settings without any delay, for tests and tooling.
    pub fn immediate() -> Self {
        Self {
            check_delay_ms: 0,
            login_delay_ms: 0,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            check_delay_ms: 100,
            login_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Seed the sample recipes when the stored catalog is empty
    pub seed_samples: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { seed_samples: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: MiRecetaConfig = toml::from_str("").unwrap();
        assert_eq!(config, MiRecetaConfig::default());
        assert_eq!(config.storage.keys.recipes, "mireceta_recipes");
        assert_eq!(config.session.check_delay(), Duration::from_millis(100));
        assert_eq!(config.session.login_delay(), Duration::from_secs(1));
        assert!(config.catalog.seed_samples);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: MiRecetaConfig = toml::from_str(
            r#"
            [storage.keys]
            user = "demo_user"

            [session]
            login_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.keys.user, "demo_user");
        assert_eq!(config.storage.keys.favorites, "mireceta_favorites");
        assert_eq!(config.session.login_delay_ms, 0);
        assert_eq!(config.session.check_delay_ms, 100);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = MiRecetaConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: MiRecetaConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
