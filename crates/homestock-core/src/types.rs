//! # Domain Types
//!
//! Core domain types used throughout HomeStock.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductForm    │──►│  ProductInput   │──►│    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name: text     │   │  name (trimmed) │   │  id (UUID)      │       │
//! │  │  quantity: text │   │  quantity ≥ 0   │   │  name           │       │
//! │  │  minQuantity:   │   │  min_qty ≥ 0    │   │  quantity       │       │
//! │  │    text         │   │                 │   │  minQuantity    │       │
//! │  └─────────────────┘   └─────────────────┘   │  createdAt      │       │
//! │    raw user input        validated            │  updatedAt      │       │
//! │                                               └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! `Product` serializes with camelCase field names and ISO-8601 timestamps,
//! which is exactly the layout of the stored product blob:
//! ```json
//! {"id":"…","name":"Leche","quantity":3,"minQuantity":1,
//!  "createdAt":"2024-05-01T10:00:00.123Z","updatedAt":"2024-05-01T10:00:00.123Z"}
//! ```

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::validation::{parse_count, validate_product_name, validate_stock_level, ValidationResult};

/// Current time at millisecond precision.
///
/// Stored timestamps carry milliseconds only, so every timestamp we produce is
/// truncated the same way; a record read back compares equal to the one saved.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generates a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Product
// =============================================================================

/// A household product being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4), immutable.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Current stock count.
    #[ts(type = "number")]
    pub quantity: i64,

    /// Reorder threshold.
    #[ts(type = "number")]
    pub min_quantity: i64,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a brand-new product with a fresh id.
    ///
    /// `created_at` and `updated_at` are the same instant.
    pub fn new(input: ProductInput) -> Self {
        let now = timestamp_now();

        Product {
            id: generate_product_id(),
            name: input.name,
            quantity: input.quantity,
            min_quantity: input.min_quantity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stock is at or below the reorder threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }

    /// `quantity - minQuantity`; negative when below threshold.
    #[inline]
    pub fn relative_stock(&self) -> i64 {
        self.quantity.saturating_sub(self.min_quantity)
    }

    /// Refreshes `updated_at`, never moving it backwards.
    pub fn touch(&mut self) {
        self.updated_at = timestamp_now().max(self.updated_at);
    }

    /// Sets an absolute quantity.
    pub fn set_quantity(&mut self, quantity: i64) -> ValidationResult<()> {
        validate_stock_level("quantity", quantity)?;
        self.quantity = quantity;
        self.touch();
        Ok(())
    }

    /// Applies a relative change, clamping at zero.
    ///
    /// ```rust
    /// use homestock_core::{Product, ProductInput};
    ///
    /// let mut p = Product::new(ProductInput::new("Pan", 3, 1).unwrap());
    /// p.adjust_quantity(-5);
    /// assert_eq!(p.quantity, 0);
    /// p.adjust_quantity(5);
    /// assert_eq!(p.quantity, 5);
    /// ```
    pub fn adjust_quantity(&mut self, delta: i64) {
        self.quantity = self.quantity.saturating_add(delta).max(0);
        self.touch();
    }

    /// Replaces the editable fields, keeping `id` and `created_at`.
    pub fn apply_input(&mut self, input: ProductInput) {
        self.name = input.name;
        self.quantity = input.quantity;
        self.min_quantity = input.min_quantity;
        self.touch();
    }
}

// =============================================================================
// Product Input
// =============================================================================

/// Validated editable fields of a product.
///
/// Build one with [`ProductInput::new`] or from form text with
/// [`ProductForm::parse`]; both enforce the same rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    /// Trimmed, non-empty name.
    pub name: String,
    pub quantity: i64,
    pub min_quantity: i64,
}

impl ProductInput {
    /// Validates and builds an input. The name is trimmed.
    pub fn new(name: &str, quantity: i64, min_quantity: i64) -> ValidationResult<Self> {
        let name = validate_product_name(name)?;
        validate_stock_level("quantity", quantity)?;
        validate_stock_level("minQuantity", min_quantity)?;

        Ok(ProductInput {
            name,
            quantity,
            min_quantity,
        })
    }
}

// =============================================================================
// Product Form
// =============================================================================

/// Raw text collected by the add/edit screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductForm {
    pub name: String,
    pub quantity: String,
    pub min_quantity: String,
}

impl ProductForm {
    /// Creates a form from raw field text.
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        min_quantity: impl Into<String>,
    ) -> Self {
        ProductForm {
            name: name.into(),
            quantity: quantity.into(),
            min_quantity: min_quantity.into(),
        }
    }

    /// Pre-fills a form with a stored product, as the edit screen does.
    pub fn from_product(product: &Product) -> Self {
        ProductForm {
            name: product.name.clone(),
            quantity: product.quantity.to_string(),
            min_quantity: product.min_quantity.to_string(),
        }
    }

    /// Parses and validates the form.
    ///
    /// The name is checked first, then both counts.
    pub fn parse(&self) -> ValidationResult<ProductInput> {
        let name = validate_product_name(&self.name)?;
        let quantity = parse_count("quantity", &self.quantity)?;
        let min_quantity = parse_count("minQuantity", &self.min_quantity)?;

        Ok(ProductInput {
            name,
            quantity,
            min_quantity,
        })
    }
}

impl TryFrom<&ProductForm> for ProductInput {
    type Error = crate::error::ValidationError;

    fn try_from(form: &ProductForm) -> Result<Self, Self::Error> {
        form.parse()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
