//! # Key-Value Slots
//!
//! The product collection is persisted as one string value under one key.
//! This module abstracts where that value lives.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       KeyValueStore                                     │
//! │          get(key) → Option<String>   set(key, value)   remove(key)     │
//! │                                                                         │
//! │   ┌──────────────────────────┐        ┌──────────────────────────┐     │
//! │   │        SqliteKv          │        │        MemoryKv          │     │
//! │   │  kv_store table, durable │        │  HashMap, process-local  │     │
//! │   └──────────────────────────┘        └──────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::trace;

use crate::error::StoreResult;

/// A persistent string slot store.
///
/// Implementations must be safe to share across tasks; the product store
/// holds one behind an `Arc`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a slot. `Ok(None)` when the key was never written or was removed.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a slot, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes a slot. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

/// Slots stored in the `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteKv {
    pool: SqlitePool,
}

impl SqliteKv {
    /// Creates a new SqliteKv over a migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteKv { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKv {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        trace!(key = %key, "kv get");

        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        trace!(key = %key, bytes = value.len(), "kv set");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        trace!(key = %key, "kv remove");

        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Slots held in a process-local map. Contents die with the process.
#[derive(Debug, Default)]
pub struct MemoryKv {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a slot, e.g. with a blob written by another client.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value.into());
        MemoryKv {
            slots: RwLock::new(slots),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.slots
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.slots.write().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
