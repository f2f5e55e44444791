//! # homestock-core: Pure Inventory Logic for HomeStock
//!
//! This crate holds the product model and every rule that can be expressed
//! without touching storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        HomeStock Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI shell (mobile / web)                      │   │
//! │  │    Home list ──► Add product ──► Product detail                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               homestock-db (Inventory service)                  │   │
//! │  │    add_product, view, decrement, adjust_quantity, ...           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ homestock-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌───────────┐                │   │
//! │  │   │   types   │  │ validation  │  │   query   │                │   │
//! │  │   │  Product  │  │ form parse  │  │ search    │                │   │
//! │  │   │  Input    │  │ name/counts │  │ sort      │                │   │
//! │  │   └───────────┘  └─────────────┘  │ low stock │                │   │
//! │  │                                   └───────────┘                │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Product`, `ProductInput`, `ProductForm`
//! - [`validation`] - Name/count rules and lenient form parsing
//! - [`query`] - Search, sort and low-stock views
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use homestock_core::query::{low_stock_count, ProductQuery, SortKey};
//! use homestock_core::{Product, ProductInput};
//!
//! let milk = Product::new(ProductInput::new("Leche", 3, 1).unwrap());
//! let bread = Product::new(ProductInput::new("Pan", 1, 3).unwrap());
//! let products = vec![milk, bread];
//!
//! let view = ProductQuery::new().low_stock_only(true).apply(&products);
//! assert_eq!(view.len(), 1);
//! assert_eq!(view[0].name, "Pan");
//! assert_eq!(low_stock_count(&products), 1);
//!
//! let by_quantity = ProductQuery::new().sort_key(SortKey::Quantity).apply(&products);
//! assert_eq!(by_quantity[0].name, "Pan");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use query::{find_product, low_stock_count, ProductQuery, SortKey, SortOrder};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key of the key-value slot holding the serialized product collection.
///
/// Installs that predate configuration overrides all wrote to this key, so
/// changing it orphans existing data.
pub const PRODUCTS_KEY: &str = "@products";
