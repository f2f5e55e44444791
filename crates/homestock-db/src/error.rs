//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error / ValidationError                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module)                                              │
//! │       │                                                                 │
//! │       ├── read path  (list_products)  → logged, empty collection       │
//! │       │                                                                 │
//! │       └── write path (save / delete)  → returned to the caller         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use homestock_core::ValidationError;
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record violates a product invariant; nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Stored blob is malformed, or a value could not be serialized.
    ///
    /// ## When This Occurs
    /// - The slot holds text that is not a JSON array of products
    /// - A write path found the slot corrupted (it is not overwritten)
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The key-value backend could not be read or written.
    ///
    /// ## When This Occurs
    /// - Pool closed or exhausted
    /// - Disk full, file permissions, locked database
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Database connection could not be opened.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::PoolTimedOut   → StorageUnavailable("Connection pool exhausted")
/// sqlx::Error::PoolClosed     → StorageUnavailable("Pool is closed")
/// Other                       → StorageUnavailable(message)
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                StoreError::StorageUnavailable("Connection pool exhausted".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::StorageUnavailable("Pool is closed".to_string()),
            sqlx::Error::Database(db_err) => {
                StoreError::StorageUnavailable(db_err.message().to_string())
            }
            other => StoreError::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
