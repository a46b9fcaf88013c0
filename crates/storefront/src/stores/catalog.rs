//! Product catalog store.
//!
//! Mirrors the `products` collection. Mutations write to the backend first
//! and only then touch the in-memory list, so a failed call leaves the
//! prior state untouched - there is nothing optimistic to roll back.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::instrument;

use sable_core::ProductId;

use crate::backend::{BackendError, CatalogApi};
use crate::models::{NewProduct, Product};

/// Pure catalog state.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub items: Vec<Product>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogState {
    /// An operation went in flight.
    pub fn op_started(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// An operation failed; items are untouched.
    pub fn op_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// A fetch completed: replace the list wholesale. Last writer wins;
    /// there is no incremental merge.
    pub fn fetched(&mut self, items: Vec<Product>) {
        self.loading = false;
        self.items = items;
    }

    /// A create completed: append the backend-assigned product.
    pub fn created(&mut self, product: Product) {
        self.loading = false;
        self.items.push(product);
    }

    /// An update completed: replace the matching entry by id. When no
    /// entry matches, the list is simply unchanged - not an error.
    pub fn updated(&mut self, product: Product) {
        self.loading = false;
        if let Some(slot) = self.items.iter_mut().find(|p| p.id == product.id) {
            *slot = product;
        }
    }

    /// A delete completed: drop the matching entry.
    pub fn removed(&mut self, id: &ProductId) {
        self.loading = false;
        self.items.retain(|p| &p.id != id);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Thread-safe container around [`CatalogState`] plus the backend calls.
pub struct CatalogStore {
    api: Arc<dyn CatalogApi>,
    state: RwLock<CatalogState>,
}

impl CatalogStore {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            state: RwLock::new(CatalogState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the full product list, replacing the in-memory one.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<(), BackendError> {
        self.write().op_started();

        match self.api.list_products().await {
            Ok(items) => {
                self.write().fetched(items);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("product fetch failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Create a product; the backend assigns the id.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: NewProduct) -> Result<Product, BackendError> {
        self.write().op_started();

        match self.api.insert_product(draft).await {
            Ok(product) => {
                self.write().created(product.clone());
                Ok(product)
            }
            Err(e) => {
                tracing::warn!("product create failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Write a product's mutable fields and replace the in-memory entry.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn update(&self, product: Product) -> Result<(), BackendError> {
        self.write().op_started();

        match self.api.update_product(&product.id, product.draft()).await {
            Ok(()) => {
                self.write().updated(product);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("product update failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Delete a product and drop it from the in-memory list.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &ProductId) -> Result<(), BackendError> {
        self.write().op_started();

        match self.api.delete_product(id).await {
            Ok(()) => {
                self.write().removed(id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("product delete failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.read().items.clone()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.read().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.write().clear_error();
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CatalogState {
        self.read().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use sable_core::{Category, Price};

    use crate::backend::MemoryBackend;
    use crate::backend::memory::Surface;

    use super::*;

    fn draft(title: &str, price: &str) -> NewProduct {
        NewProduct {
            title: title.to_owned(),
            category: Category::Streetwear,
            price: Price::new(price),
            description: None,
            images: vec!["https://cdn.example/look.jpg".to_owned()],
        }
    }

    fn store() -> (Arc<MemoryBackend>, CatalogStore) {
        let backend = Arc::new(MemoryBackend::new());
        let store = CatalogStore::new(backend.clone());
        (backend, store)
    }

    #[tokio::test]
    async fn test_fetch_replaces_list_newest_first() {
        let (backend, store) = store();
        backend.insert_product(draft("Boxy Tee", "$45")).await.unwrap();
        backend.insert_product(draft("Overshirt", "$120")).await.unwrap();

        store.fetch_all().await.unwrap();

        let items = store.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Overshirt");
        assert!(!store.loading());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_create_appends() {
        let (_, store) = store();

        let created = store.create(draft("Boxy Tee", "$45")).await.unwrap();
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].id, created.id);
    }

    #[tokio::test]
    async fn test_update_replaces_by_id() {
        let (_, store) = store();
        let mut product = store.create(draft("Boxy Tee", "$45")).await.unwrap();

        product.price = Price::new("$55");
        store.update(product.clone()).await.unwrap();

        assert_eq!(store.items()[0].price, Price::new("$55"));
    }

    #[test]
    fn test_updated_without_match_leaves_state_unchanged() {
        let mut state = CatalogState::default();
        let now = Utc::now();
        let stranger = Product {
            id: ProductId::new("nope"),
            title: "Ghost".to_owned(),
            category: Category::Outerwear,
            price: Price::new("$1"),
            description: None,
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        state.updated(stranger);
        assert!(state.items.is_empty());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_remove_filters_list() {
        let (_, store) = store();
        let product = store.create(draft("Boxy Tee", "$45")).await.unwrap();

        store.remove(&product.id).await.unwrap();
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_items_and_sets_error() {
        let (backend, store) = store();
        store.create(draft("Boxy Tee", "$45")).await.unwrap();

        backend.fail(Surface::Catalog);
        let result = store.fetch_all().await;

        assert!(result.is_err());
        assert_eq!(store.items().len(), 1);
        assert!(store.error().is_some());
        assert!(!store.loading());

        backend.restore(Surface::Catalog);
        store.fetch_all().await.unwrap();
        assert!(store.error().is_none());
    }
}
