//! # Inventory Service
//!
//! The actions the HomeStock screens perform, expressed over the product
//! store and the query engine.
//!
//! ## Screen → Action Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  List screen                                                            │
//! │  ├── search box / sort buttons / low-stock toggle  → view(query)       │
//! │  ├── "−" button on a row                           → decrement(id)     │
//! │  └── tap a row                                     → get_product(id)   │
//! │                                                                         │
//! │  Add screen                                                            │
//! │  └── save                                → add_product_from_form(form) │
//! │                                                                         │
//! │  Detail / edit screen                                                  │
//! │  ├── ±1 / ±5 buttons                     → adjust_quantity(id, delta)  │
//! │  ├── save                                → edit_product_from_form(..)  │
//! │  └── delete                              → delete_product(id)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation goes through [`ProductStore`]; screens re-run
//! [`Inventory::view`] afterwards to refresh.

use homestock_core::{low_stock_count, Product, ProductForm, ProductInput, ProductQuery};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::repository::product::ProductStore;

/// Quick stock adjustments offered by the detail screen.
pub const QUICK_ADJUSTMENTS: [i64; 4] = [-5, -1, 1, 5];

/// What the list screen renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    /// Filtered and ordered products.
    pub products: Vec<Product>,

    /// Low-stock products in the whole collection, ignoring the query.
    pub low_stock_count: usize,

    /// Size of the whole collection.
    pub total: usize,
}

/// Collaborator-facing inventory actions.
#[derive(Debug, Clone)]
pub struct Inventory {
    store: ProductStore,
}

impl Inventory {
    pub fn new(store: ProductStore) -> Self {
        Inventory { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Builds the list screen contents for `query`.
    pub async fn view(&self, query: &ProductQuery) -> InventoryView {
        let all = self.store.list_products().await;
        let products = query.apply(&all);

        debug!(
            total = all.len(),
            shown = products.len(),
            sort = %query.sort_key,
            "Built inventory view"
        );

        InventoryView {
            low_stock_count: low_stock_count(&all),
            total: all.len(),
            products,
        }
    }

    pub async fn get_product(&self, id: &str) -> Option<Product> {
        self.store.get_product(id).await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Creates a product with a fresh id and matching timestamps.
    pub async fn add_product(&self, input: ProductInput) -> StoreResult<Product> {
        let product = Product::new(input);
        info!(id = %product.id, name = %product.name, "Adding product");
        self.store.save_product(product).await
    }

    /// Validates raw form text, then adds the product.
    pub async fn add_product_from_form(&self, form: &ProductForm) -> StoreResult<Product> {
        let input = form.parse()?;
        self.add_product(input).await
    }

    /// Replaces name and both counts, keeping `id` and `createdAt`.
    ///
    /// `Ok(None)` when the product no longer exists.
    pub async fn edit_product(&self, id: &str, input: ProductInput) -> StoreResult<Option<Product>> {
        debug!(id = %id, "Editing product");
        self.store
            .update_product(id, |p| {
                p.apply_input(input);
                true
            })
            .await
    }

    /// Validates raw form text, then edits the product.
    pub async fn edit_product_from_form(
        &self,
        id: &str,
        form: &ProductForm,
    ) -> StoreResult<Option<Product>> {
        let input = form.parse()?;
        self.edit_product(id, input).await
    }

    /// Takes one unit out of stock.
    ///
    /// A product already at zero is returned untouched and nothing is written.
    pub async fn decrement(&self, id: &str) -> StoreResult<Option<Product>> {
        self.store
            .update_product(id, |p| {
                if p.quantity > 0 {
                    p.adjust_quantity(-1);
                    true
                } else {
                    false
                }
            })
            .await
    }

    /// Applies a relative change, clamping the result at zero.
    pub async fn adjust_quantity(&self, id: &str, delta: i64) -> StoreResult<Option<Product>> {
        debug!(id = %id, delta, "Adjusting quantity");
        self.store
            .update_product(id, |p| {
                p.adjust_quantity(delta);
                true
            })
            .await
    }

    /// Sets an absolute quantity. Negative values are rejected.
    pub async fn set_quantity(&self, id: &str, quantity: i64) -> StoreResult<Option<Product>> {
        self.store.update_quantity(id, quantity).await
    }

    pub async fn delete_product(&self, id: &str) -> StoreResult<bool> {
        self.store.delete_product(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::kv::MemoryKv;
    use crate::pool::{Database, DbConfig};
    use homestock_core::{SortKey, SortOrder, ValidationError};
    use std::sync::Arc;

    fn inventory() -> Inventory {
        Inventory::new(ProductStore::new(Arc::new(MemoryKv::new())))
    }

    fn input(name: &str, quantity: i64, min_quantity: i64) -> ProductInput {
        ProductInput::new(name, quantity, min_quantity).unwrap()
    }

    fn names(view: &InventoryView) -> Vec<&str> {
        view.products.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_from_form_trims_and_parses() {
        let inv = inventory();
        let form = ProductForm::new("  Café ", "5", "2");

        let added = inv.add_product_from_form(&form).await.unwrap();

        assert_eq!(added.name, "Café");
        assert_eq!(added.quantity, 5);
        assert_eq!(added.min_quantity, 2);
        assert_eq!(added.created_at, added.updated_at);
        assert_eq!(inv.get_product(&added.id).await, Some(added));
    }

    #[tokio::test]
    async fn test_add_from_form_rejects_bad_input() {
        let inv = inventory();

        let err = inv
            .add_product_from_form(&ProductForm::new("  ", "1", "1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Required { .. })
        ));

        let err = inv
            .add_product_from_form(&ProductForm::new("Pan", "-3", "1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Negative { .. })
        ));

        assert_eq!(inv.view(&ProductQuery::default()).await.total, 0);
    }

    #[tokio::test]
    async fn test_view_low_stock_filter_and_count() {
        let inv = inventory();
        inv.add_product(input("Leche", 3, 1)).await.unwrap();
        let pan = inv.add_product(input("Pan", 1, 3)).await.unwrap();

        let all = inv.view(&ProductQuery::default()).await;
        assert_eq!(all.total, 2);
        assert_eq!(all.low_stock_count, 1);
        assert_eq!(names(&all), vec!["Leche", "Pan"]);

        let low = inv.view(&ProductQuery::new().low_stock_only(true)).await;
        assert_eq!(low.products.len(), 1);
        assert_eq!(low.products[0].id, pan.id);
        assert_eq!(low.low_stock_count, 1);
        assert_eq!(low.total, 2);
    }

    #[tokio::test]
    async fn test_view_search_does_not_change_count() {
        let inv = inventory();
        inv.add_product(input("Leche", 0, 1)).await.unwrap();
        inv.add_product(input("Pan", 1, 3)).await.unwrap();
        inv.add_product(input("Arroz", 9, 1)).await.unwrap();

        let view = inv.view(&ProductQuery::new().search("LE")).await;
        assert_eq!(names(&view), vec!["Leche"]);
        assert_eq!(view.low_stock_count, 2);
    }

    #[tokio::test]
    async fn test_view_sorting() {
        let inv = inventory();
        inv.add_product(input("Pan", 1, 3)).await.unwrap();
        inv.add_product(input("Arroz", 4, 1)).await.unwrap();

        let asc = inv.view(&ProductQuery::default()).await;
        assert_eq!(names(&asc), vec!["Arroz", "Pan"]);

        let desc = inv
            .view(&ProductQuery::new().sort_order(SortOrder::Desc))
            .await;
        assert_eq!(names(&desc), vec!["Pan", "Arroz"]);

        let by_relative = inv
            .view(&ProductQuery::new().sort_key(SortKey::Relative))
            .await;
        assert_eq!(names(&by_relative), vec!["Pan", "Arroz"]);
    }

    #[tokio::test]
    async fn test_decrement_stops_at_zero() {
        let inv = inventory();
        let p = inv.add_product(input("Huevos", 1, 6)).await.unwrap();

        let once = inv.decrement(&p.id).await.unwrap().unwrap();
        assert_eq!(once.quantity, 0);

        let twice = inv.decrement(&p.id).await.unwrap().unwrap();
        assert_eq!(twice, once);
        assert_eq!(inv.get_product(&p.id).await.unwrap().quantity, 0);

        assert_eq!(inv.decrement("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_quick_adjustments_clamp() {
        let inv = inventory();
        let p = inv.add_product(input("Aceite", 3, 1)).await.unwrap();

        let mut quantity = p.quantity;
        for delta in QUICK_ADJUSTMENTS {
            let updated = inv.adjust_quantity(&p.id, delta).await.unwrap().unwrap();
            quantity = (quantity + delta).max(0);
            assert_eq!(updated.quantity, quantity);
        }
        assert_eq!(inv.get_product(&p.id).await.unwrap().quantity, 6);
    }

    #[tokio::test]
    async fn test_set_quantity() {
        let inv = inventory();
        let p = inv.add_product(input("Sal", 1, 1)).await.unwrap();

        assert_eq!(inv.set_quantity(&p.id, 4).await.unwrap().unwrap().quantity, 4);
        assert!(inv.set_quantity(&p.id, -4).await.is_err());
        assert_eq!(inv.get_product(&p.id).await.unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn test_edit_keeps_identity() {
        let inv = inventory();
        let p = inv.add_product(input("Leche", 3, 1)).await.unwrap();

        let form = ProductForm::from_product(&p);
        let form = ProductForm {
            name: " Leche entera ".to_string(),
            quantity: "6".to_string(),
            ..form
        };
        let edited = inv.edit_product_from_form(&p.id, &form).await.unwrap().unwrap();

        assert_eq!(edited.id, p.id);
        assert_eq!(edited.created_at, p.created_at);
        assert_eq!(edited.name, "Leche entera");
        assert_eq!((edited.quantity, edited.min_quantity), (6, 1));
        assert!(edited.updated_at >= p.updated_at);
        assert_eq!(inv.view(&ProductQuery::default()).await.total, 1);

        let missing = inv.edit_product("missing", input("X", 1, 1)).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let inv = inventory();
        let p = inv.add_product(input("Pan", 1, 3)).await.unwrap();

        assert!(inv.delete_product(&p.id).await.unwrap());
        assert!(!inv.delete_product(&p.id).await.unwrap());
        assert_eq!(inv.get_product(&p.id).await, None);
    }

    #[tokio::test]
    async fn test_inventory_over_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let inv = db.inventory();

        inv.add_product(input("Leche", 3, 1)).await.unwrap();
        let pan = inv.add_product(input("Pan", 1, 3)).await.unwrap();
        inv.decrement(&pan.id).await.unwrap();

        let view = db.inventory().view(&ProductQuery::new().low_stock_only(true)).await;
        assert_eq!(view.products.len(), 1);
        assert_eq!(view.products[0].quantity, 0);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let view = InventoryView {
            products: Vec::new(),
            low_stock_count: 2,
            total: 5,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["lowStockCount"], 2);
        assert_eq!(json["total"], 5);
    }
}
