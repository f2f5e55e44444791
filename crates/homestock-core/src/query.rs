//! # Query/View Engine
//!
//! Turns the stored product collection into the list a screen displays.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ProductQuery::apply                                  │
//! │                                                                         │
//! │  &[Product] (full collection, untouched)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. search_text   name contains text (case-insensitive, "" = all)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. low_stock_only   keep quantity <= minQuantity                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. sort   name (case-folded) | quantity | relative (qty - min)        │
//! │            asc | desc, stable: ties keep input order                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<Product> (new, ordered)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`low_stock_count`] is computed over the whole collection and is not
//! affected by any query parameter.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::Product;

// =============================================================================
// Sort Key / Order
// =============================================================================

/// Field the product list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortKey {
    /// Case-folded name.
    #[default]
    Name,
    /// Raw quantity.
    Quantity,
    /// `quantity - minQuantity`.
    Relative,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::Quantity => write!(f, "quantity"),
            SortKey::Relative => write!(f, "relative"),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Arrow shown next to the active sort button.
    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

// =============================================================================
// Product Query
// =============================================================================

/// View parameters for the product list.
///
/// ## Example
/// ```rust
/// use homestock_core::query::{ProductQuery, SortKey, SortOrder};
///
/// let mut query = ProductQuery::new().search("le");
/// query.select_sort(SortKey::Name);      // already active: flips to desc
/// assert_eq!(query.sort_order, SortOrder::Desc);
/// query.select_sort(SortKey::Quantity);  // new key: asc
/// assert_eq!(query.sort_order, SortOrder::Asc);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProductQuery {
    pub search_text: String,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub low_stock_only: bool,
}

impl ProductQuery {
    /// All products, by name ascending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Sets the sort key.
    pub fn sort_key(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }

    /// Sets the sort direction.
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Restricts the view to low-stock products.
    pub fn low_stock_only(mut self, enabled: bool) -> Self {
        self.low_stock_only = enabled;
        self
    }

    /// Handles a press on a sort button.
    ///
    /// The active key flips direction; any other key becomes active ascending.
    pub fn select_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_key = key;
            self.sort_order = SortOrder::Asc;
        }
    }

    /// Whether `product` passes both filters.
    pub fn matches(&self, product: &Product) -> bool {
        matches_search(product, &self.search_text.to_lowercase())
            && (!self.low_stock_only || product.is_low_stock())
    }

    /// Three-way comparison for the configured key and direction.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ordering = match self.sort_key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Quantity => a.quantity.cmp(&b.quantity),
            SortKey::Relative => a.relative_stock().cmp(&b.relative_stock()),
        };

        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Filters then sorts, returning a new list.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self.search_text.to_lowercase();

        let mut view: Vec<Product> = products
            .iter()
            .filter(|p| matches_search(p, &needle))
            .filter(|p| !self.low_stock_only || p.is_low_stock())
            .cloned()
            .collect();

        // sort_by is stable
        view.sort_by(|a, b| self.compare(a, b));
        view
    }
}

/// `needle` must already be lowercase.
fn matches_search(product: &Product, needle: &str) -> bool {
    needle.is_empty() || product.name.to_lowercase().contains(needle)
}

/// Finds a product by id.
pub fn find_product<'a>(products: &'a [Product], id: &str) -> CoreResult<&'a Product> {
    products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
}

/// Number of low-stock products in the full collection.
pub fn low_stock_count(products: &[Product]) -> usize {
    products.iter().filter(|p| p.is_low_stock()).count()
}

// =============================================================================
// Unit Tests
// =============================================================================
