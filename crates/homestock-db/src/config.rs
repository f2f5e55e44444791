//! # HomeStock Configuration
//!
//! Where the database lives and which slot holds the products.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     HOMESTOCK_DB_PATH=/data/homestock.db                               │
//! │     HOMESTOCK_PRODUCTS_KEY=@products                                   │
//! │     HOMESTOCK_MAX_CONNECTIONS=2                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/homestock/homestock.toml (Linux)                         │
//! │     ~/Library/Application Support/com.homestock.homestock/ (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     <data dir>/homestock.db, slot "@products"                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # homestock.toml
//! [storage]
//! database_path = "/home/me/.local/share/homestock/homestock.db"
//! max_connections = 4
//! connect_timeout_secs = 30
//!
//! [products]
//! key = "@products"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use homestock_core::PRODUCTS_KEY;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::pool::DbConfig;

pub const ENV_DB_PATH: &str = "HOMESTOCK_DB_PATH";
pub const ENV_PRODUCTS_KEY: &str = "HOMESTOCK_PRODUCTS_KEY";
pub const ENV_MAX_CONNECTIONS: &str = "HOMESTOCK_MAX_CONNECTIONS";

const CONFIG_FILE_NAME: &str = "homestock.toml";
const DATABASE_FILE_NAME: &str = "homestock.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "homestock", "homestock")
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Database file and pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file. `None` means `homestock.db` in the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Pool size. Default: 4
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a connection. Default: 30
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    4
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

// =============================================================================
// Product Settings
// =============================================================================

/// Product collection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSettings {
    /// Slot holding the serialized collection.
    #[serde(default = "default_products_key")]
    pub key: String,
}

fn default_products_key() -> String {
    PRODUCTS_KEY.to_string()
}

impl Default for ProductSettings {
    fn default() -> Self {
        ProductSettings {
            key: default_products_key(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete HomeStock configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomestockConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub products: ProductSettings,
}

impl HomestockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`homestock.toml`, or `config_path` if given)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file, creating its directory.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.products.key.trim().is_empty() {
            return Err(StoreError::Config("products.key must not be empty".into()));
        }

        if self.storage.max_connections == 0 {
            return Err(StoreError::Config(
                "storage.max_connections must be greater than 0".into(),
            ));
        }

        if self.storage.connect_timeout_secs == 0 {
            return Err(StoreError::Config(
                "storage.connect_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// `lookup` is normally `std::env::var`; unparseable values are ignored
    /// with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup(ENV_PRODUCTS_KEY) {
            debug!(key = %key, "Overriding products key from environment");
            self.products.key = key;
        }

        if let Some(max) = lookup(ENV_MAX_CONNECTIONS) {
            match max.parse::<u32>() {
                Ok(n) => self.storage.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid {}", ENV_MAX_CONNECTIONS),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Database file to open.
    ///
    /// Falls back to the platform data dir, then to the working directory.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.database_path {
            return path.clone();
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }

    /// Pool configuration for [`crate::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path())
            .max_connections(self.storage.max_connections)
            .connect_timeout(Duration::from_secs(self.storage.connect_timeout_secs))
            .products_key(self.products.key.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
