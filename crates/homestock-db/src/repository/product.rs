//! # Product Store
//!
//! The single source of truth for the product collection.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kv slot "@products"                                                    │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  [{"id":"…","name":"Leche","quantity":3,"minQuantity":1,               │
//! │    "createdAt":"…Z","updatedAt":"…Z"}, …]                              │
//! │                                                                         │
//! │  No version field. Absent or blank slot = empty collection.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read-Modify-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save / delete / update                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write_lock.lock()   ← one writer at a time across every clone         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load whole blob (strict: corrupted blob → Serialization error)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  mutate Vec<Product>                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write whole blob                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads take no lock and never fail: an unreadable slot is logged and
//! treated as an empty collection.

use std::fmt;
use std::sync::Arc;

use homestock_core::types::timestamp_now;
use homestock_core::validation::{validate_product, validate_stock_level, ValidationResult};
use homestock_core::{find_product, Product, PRODUCTS_KEY};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

/// Repository for the serialized product collection.
///
/// ## Usage
/// ```rust,ignore
/// let store = ProductStore::new(Arc::new(MemoryKv::new()));
///
/// let saved = store.save_product(product).await?;
/// let all = store.list_products().await;
/// store.delete_product(&saved.id).await?;
/// ```
#[derive(Clone)]
pub struct ProductStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Arc<Mutex<()>>,
}

impl fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl ProductStore {
    /// Creates a store over the default [`PRODUCTS_KEY`] slot.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, PRODUCTS_KEY)
    }

    /// Creates a store over a custom slot.
    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        ProductStore {
            kv,
            key: key.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The slot this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    // =========================================================================
    // Read path
    // =========================================================================

    /// Returns every stored product, in stored order.
    ///
    /// Never fails: an absent, blank, unreadable or malformed slot yields an
    /// empty list (and a warning in the log for the last two).
    pub async fn list_products(&self) -> Vec<Product> {
        match self.load().await {
            Ok(products) => {
                debug!(count = products.len(), "Listed products");
                products
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Could not read products, using empty collection");
                Vec::new()
            }
        }
    }

    /// Looks up a single product.
    pub async fn get_product(&self, id: &str) -> Option<Product> {
        let products = self.list_products().await;
        match find_product(&products, id) {
            Ok(product) => Some(product.clone()),
            Err(e) => {
                debug!(error = %e, "Lookup missed");
                None
            }
        }
    }

    /// Number of stored products (for diagnostics).
    pub async fn count(&self) -> usize {
        self.list_products().await.len()
    }

    // =========================================================================
    // Write path
    // =========================================================================

    /// Inserts or replaces a product.
    ///
    /// ## Behavior
    /// - Unknown `id`: appended as given.
    /// - Known `id`: replaced in place. The stored `createdAt` is kept and
    ///   `updatedAt` is set to now (never earlier than the previous value).
    ///
    /// - The name is stored trimmed.
    ///
    /// Validation runs on the merged record, so a replacement is checked with
    /// the stored `createdAt` it will actually carry.
    ///
    /// ## Returns
    /// The record exactly as persisted.
    pub async fn save_product(&self, product: Product) -> StoreResult<Product> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await?;

        let stored = upsert(&mut products, product)?;
        self.write(&products).await?;

        debug!(id = %stored.id, count = products.len(), "Saved product");
        Ok(stored)
    }

    /// Removes a product.
    ///
    /// ## Returns
    /// * `Ok(true)` - removed
    /// * `Ok(false)` - no such id; nothing was written
    pub async fn delete_product(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await?;

        let before = products.len();
        products.retain(|p| p.id != id);

        if products.len() == before {
            debug!(id = %id, "Delete skipped, product not found");
            return Ok(false);
        }

        self.write(&products).await?;
        info!(id = %id, "Deleted product");
        Ok(true)
    }

    /// Sets an absolute quantity.
    ///
    /// ## Returns
    /// * `Ok(Some(product))` - updated record
    /// * `Ok(None)` - no such id; nothing was written
    pub async fn update_quantity(&self, id: &str, new_quantity: i64) -> StoreResult<Option<Product>> {
        validate_stock_level("quantity", new_quantity)?;

        debug!(id = %id, quantity = new_quantity, "Updating quantity");
        self.update_product(id, |p| {
            p.quantity = new_quantity;
            true
        })
        .await
    }

    /// Loads one product, lets `mutate` change it and saves the result, all
    /// under the writer lock.
    ///
    /// `mutate` returns whether it changed anything; when it returns `false`
    /// the stored record is returned untouched and nothing is written. The id
    /// cannot be changed: whatever `mutate` does to it is discarded.
    pub async fn update_product<F>(&self, id: &str, mutate: F) -> StoreResult<Option<Product>>
    where
        F: FnOnce(&mut Product) -> bool + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await?;

        let Some(current) = products.iter().find(|p| p.id == id).cloned() else {
            debug!(id = %id, "Update skipped, product not found");
            return Ok(None);
        };

        let mut updated = current.clone();
        if !mutate(&mut updated) {
            return Ok(Some(current));
        }
        updated.id = current.id;

        let stored = upsert(&mut products, updated)?;
        self.write(&products).await?;

        debug!(id = %id, quantity = stored.quantity, "Updated product");
        Ok(Some(stored))
    }

    /// Removes the whole collection slot.
    pub async fn clear(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.kv.remove(&self.key).await?;
        info!(key = %self.key, "Cleared product collection");
        Ok(())
    }

    // =========================================================================
    // Blob I/O
    // =========================================================================

    /// Strict load used by the write path.
    async fn load(&self) -> StoreResult<Vec<Product>> {
        let Some(blob) = self.kv.get(&self.key).await? else {
            return Ok(Vec::new());
        };

        if blob.trim().is_empty() {
            return Ok(Vec::new());
        }

        // "null" is what a JS client writes for an unset collection
        let products: Option<Vec<Product>> = serde_json::from_str(&blob)?;
        Ok(products.unwrap_or_default())
    }

    async fn write(&self, products: &[Product]) -> StoreResult<()> {
        let blob = serde_json::to_string(products)?;
        self.kv.set(&self.key, &blob).await
    }
}

/// Replaces the record with the same id, or appends. Returns what was stored.
///
/// The name is trimmed; a replacement keeps the stored `createdAt` and gets a
/// fresh `updatedAt`. The merged record is validated before it is placed.
fn upsert(products: &mut Vec<Product>, mut product: Product) -> ValidationResult<Product> {
    product.name = product.name.trim().to_string();

    let existing = products.iter().position(|p| p.id == product.id);
    if let Some(index) = existing {
        let previous = &products[index];
        product.created_at = previous.created_at;
        product.updated_at = timestamp_now()
            .max(previous.updated_at)
            .max(product.created_at);
    }

    validate_product(&product)?;

    match existing {
        Some(index) => products[index] = product.clone(),
        None => products.push(product.clone()),
    }
    Ok(product)
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
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use homestock_core::{ProductInput, ValidationError};

    fn memory_store() -> (Arc<MemoryKv>, ProductStore) {
        let kv = Arc::new(MemoryKv::new());
        (kv.clone(), ProductStore::new(kv))
    }

    fn product(name: &str, quantity: i64, min_quantity: i64) -> Product {
        Product::new(ProductInput::new(name, quantity, min_quantity).unwrap())
    }

    /// Backend whose reads work but whose writes always fail.
    struct ReadOnlyKv(MemoryKv);

    #[async_trait]
    impl KeyValueStore for ReadOnlyKv {
        async fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.0.get(key).await
        }

        async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::StorageUnavailable("disk full".to_string()))
        }

        async fn remove(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::StorageUnavailable("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_empty_slot_lists_nothing() {
        let (_, store) = memory_store();
        assert!(store.list_products().await.is_empty());
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_blank_and_null_slots_are_empty() {
        for blob in ["", "   ", "null"] {
            let store = ProductStore::new(Arc::new(MemoryKv::with_slot(PRODUCTS_KEY, blob)));
            assert!(store.list_products().await.is_empty(), "blob {blob:?}");
            store.save_product(product("Pan", 1, 1)).await.unwrap();
            assert_eq!(store.count().await, 1);
        }
    }

    #[tokio::test]
    async fn test_two_saves_list_both() {
        let (_, store) = memory_store();
        let p1 = product("Leche", 3, 1);
        let p2 = product("Pan", 1, 3);

        store.save_product(p1.clone()).await.unwrap();
        store.save_product(p2.clone()).await.unwrap();

        assert_eq!(store.list_products().await, vec![p1, p2]);
    }

    #[tokio::test]
    async fn test_save_existing_id_replaces_in_place() {
        let (_, store) = memory_store();
        let first = product("Leche", 3, 1);
        let second = product("Pan", 1, 3);
        store.save_product(first.clone()).await.unwrap();
        store.save_product(second.clone()).await.unwrap();

        let mut edited = first.clone();
        edited.name = "Leche entera".to_string();
        edited.quantity = 8;
        let stored = store.save_product(edited).await.unwrap();

        let products = store.list_products().await;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, first.id);
        assert_eq!(products[0].name, "Leche entera");
        assert_eq!(products[0].quantity, 8);
        assert_eq!(products[1], second);
        assert_eq!(stored, products[0]);
        assert!(stored.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn test_replace_keeps_created_at_and_never_rewinds_updated_at() {
        let (_, store) = memory_store();
        let first = product("Sal", 1, 0);
        let future = Utc::now() + Duration::days(2);

        let mut ahead = first.clone();
        ahead.updated_at = future;
        store.save_product(ahead).await.unwrap();

        let mut replacement = first.clone();
        replacement.created_at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        replacement.updated_at = replacement.created_at;
        let stored = store.save_product(replacement).await.unwrap();

        assert_eq!(stored.created_at, first.created_at);
        assert_eq!(stored.updated_at, future);
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_records() {
        let (kv, store) = memory_store();

        let mut negative = product("Pan", 1, 1);
        negative.min_quantity = -2;
        let err = store.save_product(negative).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Negative { .. })
        ));

        let mut blank = product("Pan", 1, 1);
        blank.name = "   ".to_string();
        assert!(store.save_product(blank).await.is_err());

        assert_eq!(kv.get(PRODUCTS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_noop() {
        let (kv, store) = memory_store();
        let p = product("Leche", 3, 1);
        store.save_product(p.clone()).await.unwrap();
        let blob_before = kv.get(PRODUCTS_KEY).await.unwrap();

        assert!(!store.delete_product("does-not-exist").await.unwrap());

        assert_eq!(kv.get(PRODUCTS_KEY).await.unwrap(), blob_before);
        assert_eq!(store.list_products().await, vec![p]);
    }

    #[tokio::test]
    async fn test_delete_removes_only_matching() {
        let (_, store) = memory_store();
        let keep = product("Leche", 3, 1);
        let drop = product("Pan", 1, 3);
        store.save_product(keep.clone()).await.unwrap();
        store.save_product(drop.clone()).await.unwrap();

        assert!(store.delete_product(&drop.id).await.unwrap());
        assert_eq!(store.list_products().await, vec![keep]);
        assert_eq!(store.get_product(&drop.id).await, None);
    }

    #[tokio::test]
    async fn test_update_quantity() {
        let (_, store) = memory_store();
        let p = store.save_product(product("Arroz", 2, 1)).await.unwrap();

        let updated = store.update_quantity(&p.id, 7).await.unwrap().unwrap();
        assert_eq!(updated.quantity, 7);
        assert!(updated.updated_at >= p.updated_at);
        assert_eq!(store.get_product(&p.id).await.unwrap().quantity, 7);

        assert_eq!(store.update_quantity("nope", 3).await.unwrap(), None);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_update_quantity_rejects_negative() {
        let (_, store) = memory_store();
        let p = store.save_product(product("Arroz", 2, 1)).await.unwrap();

        let err = store.update_quantity(&p.id, -1).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.get_product(&p.id).await.unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_update_product_without_change_does_not_write() {
        let (_, store) = memory_store();
        let p = store.save_product(product("Sal", 0, 1)).await.unwrap();

        let result = store.update_product(&p.id, |_| false).await.unwrap();
        assert_eq!(result, Some(p.clone()));
        assert_eq!(store.get_product(&p.id).await, Some(p));
    }

    #[tokio::test]
    async fn test_update_product_cannot_change_id() {
        let (_, store) = memory_store();
        let p = store.save_product(product("Pan", 1, 3)).await.unwrap();

        let updated = store
            .update_product(&p.id, |x| {
                x.id = "other".to_string();
                x.quantity = 9;
                true
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, p.id);
        assert_eq!(updated.quantity, 9);

        let products = store.list_products().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, p.id);
        assert_eq!(products[0].quantity, 9);
        assert_eq!(store.get_product("other").await, None);
    }

    #[tokio::test]
    async fn test_save_stores_trimmed_name() {
        let (_, store) = memory_store();
        let mut p = product("Pan", 1, 3);
        p.name = "  Pan  ".to_string();

        let stored = store.save_product(p.clone()).await.unwrap();
        assert_eq!(stored.name, "Pan");
        assert_eq!(store.get_product(&p.id).await.unwrap().name, "Pan");

        let renamed = store
            .update_product(&p.id, |x| {
                x.name = " Pan integral ".to_string();
                true
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Pan integral");
    }

    #[tokio::test]
    async fn test_replace_validates_with_stored_created_at() {
        let (_, store) = memory_store();
        let first = store.save_product(product("Leche", 3, 1)).await.unwrap();

        let mut replacement = first.clone();
        replacement.quantity = 5;
        replacement.created_at = Utc::now() + Duration::days(3);
        replacement.updated_at = first.updated_at;

        let stored = store.save_product(replacement).await.unwrap();
        assert_eq!(stored.created_at, first.created_at);
        assert!(stored.updated_at >= stored.created_at);
        assert_eq!(stored.quantity, 5);

        let mut fresh = product("Pan", 1, 3);
        fresh.created_at = fresh.updated_at + Duration::seconds(1);
        let err = store.save_product(fresh).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::InvalidTimestamps)
        ));
    }

    #[tokio::test]
    async fn test_corrupted_blob_reads_empty_but_blocks_writes() {
        let kv = Arc::new(MemoryKv::with_slot(PRODUCTS_KEY, "{not json"));
        let store = ProductStore::new(kv.clone());

        assert!(store.list_products().await.is_empty());

        let err = store.save_product(product("Pan", 1, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
        assert_eq!(kv.get(PRODUCTS_KEY).await.unwrap().as_deref(), Some("{not json"));

        store.clear().await.unwrap();
        store.save_product(product("Pan", 1, 1)).await.unwrap();
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let p = product("Leche", 3, 1);
        let seeded = serde_json::to_string(&vec![p.clone()]).unwrap();
        let store = ProductStore::new(Arc::new(ReadOnlyKv(MemoryKv::with_slot(
            PRODUCTS_KEY,
            seeded,
        ))));

        let err = store.save_product(product("Pan", 1, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable(_)));

        let err = store.delete_product(&p.id).await.unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable(_)));

        assert_eq!(store.list_products().await, vec![p]);
    }

    #[tokio::test]
    async fn test_custom_key_is_isolated() {
        let kv = Arc::new(MemoryKv::new());
        let default_store = ProductStore::new(kv.clone());
        let other_store = ProductStore::with_key(kv, "@products-test");

        other_store.save_product(product("Pan", 1, 1)).await.unwrap();

        assert_eq!(other_store.key(), "@products-test");
        assert!(default_store.list_products().await.is_empty());
        assert_eq!(other_store.count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_writers_do_not_lose_updates() {
        let (_, store) = memory_store();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .save_product(product(&format!("Producto {i}"), i, 1))
                        .await
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.count().await, 20);
    }

    #[tokio::test]
    async fn test_concurrent_adjustments_all_apply() {
        let (_, store) = memory_store();
        let p = store.save_product(product("Huevos", 0, 6)).await.unwrap();

        let handles: Vec<_> = (0..12)
            .map(|_| {
                let store = store.clone();
                let id = p.id.clone();
                tokio::spawn(async move {
                    store
                        .update_product(&id, |p| {
                            p.adjust_quantity(1);
                            true
                        })
                        .await
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get_product(&p.id).await.unwrap().quantity, 12);
    }

    #[tokio::test]
    async fn test_reads_degrade_when_sqlite_is_closed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.products();
        store.save_product(product("Leche", 3, 1)).await.unwrap();

        db.close().await;

        assert!(store.list_products().await.is_empty());
        let err = store.save_product(product("Pan", 1, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn test_reads_blob_written_by_js_client() {
        let blob = r#"[{"id":"1714557600000","name":"Leche","quantity":3,"minQuantity":1,
            "createdAt":"2024-05-01T10:00:00.000Z","updatedAt":"2024-05-01T10:00:00.000Z"},
            {"id":"1714557600001","name":"Pan","quantity":1,"minQuantity":3,
            "createdAt":"2024-05-01T10:00:00.001Z","updatedAt":"2024-05-01T10:00:00.001Z"}]"#;
        let store = ProductStore::new(Arc::new(MemoryKv::with_slot(PRODUCTS_KEY, blob)));

        let products = store.list_products().await;
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].name, "Pan");

        let updated = store.update_quantity("1714557600001", 4).await.unwrap().unwrap();
        assert_eq!(updated.created_at, products[1].created_at);
        assert!(updated.updated_at > products[1].updated_at);
    }
}
