//! # homestock-db: Storage Layer for HomeStock
//!
//! Persists the product collection and exposes the actions the screens use.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        HomeStock Data Flow                              │
//! │                                                                         │
//! │  Screen action (add, decrement, search...)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   homestock-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Inventory   │───►│ ProductStore  │───►│ KeyValueStore│  │   │
//! │  │   │ (inventory.rs)│    │ (repository/) │    │   (kv.rs)    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────┬───────┘  │   │
//! │  │                                                    │          │   │
//! │  │   ┌───────────────┐    ┌───────────────┐           │          │   │
//! │  │   │   Database    │    │  Migrations   │           │          │   │
//! │  │   │   (pool.rs)   │    │ 001_kv_store  │           │          │   │
//! │  │   └───────────────┘    └───────────────┘           │          │   │
//! │  └────────────────────────────────────────────────────┼──────────┘   │
//! │                                                       ▼               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite  kv_store("@products" → JSON array)                     │   │
//! │  │  ~/.local/share/homestock/homestock.db                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and the [`Database`] handle
//! - [`migrations`] - Embedded database migrations
//! - [`kv`] - Key-value slot backends
//! - [`repository`] - The product store
//! - [`inventory`] - Screen-level actions and views
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use homestock_core::{ProductForm, ProductQuery};
//! use homestock_db::{Database, HomestockConfig};
//!
//! let config = HomestockConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let inventory = db.inventory();
//! inventory.add_product_from_form(&ProductForm::new("Café", "5", "2")).await?;
//! let view = inventory.view(&ProductQuery::default()).await;
//! println!("{} products, {} low", view.total, view.low_stock_count);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod inventory;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::HomestockConfig;
pub use error::{StoreError, StoreResult};
pub use inventory::{Inventory, InventoryView};
pub use kv::{KeyValueStore, MemoryKv, SqliteKv};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::ProductStore;
