//! # Repository Module
//!
//! Persistence for the product collection.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Inventory service / seed binary                                        │
//! │       │                                                                 │
//! │       │  db.products().save_product(product)                           │
//! │       ▼                                                                 │
//! │  ProductStore                                                          │
//! │  ├── list_products(&self)                                              │
//! │  ├── save_product(&self, product)                                      │
//! │  ├── delete_product(&self, id)                                         │
//! │  └── update_quantity(&self, id, quantity)                              │
//! │       │                                                                 │
//! │       │  one JSON blob                                                  │
//! │       ▼                                                                 │
//! │  KeyValueStore (SQLite kv_store table, or in-memory)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductStore`] - Product collection CRUD

pub mod product;
