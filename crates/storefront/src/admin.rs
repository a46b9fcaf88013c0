//! Admin back-office.
//!
//! A facade over the catalog, orders, and messages stores whose every
//! operation is gated on the auth store's admin flag. A non-admin caller
//! gets the static denial message back; no store state changes and no
//! backend call is made.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use sable_core::{MessageId, OrderId, OrderStatus, ProductId};

use crate::backend::BackendError;
use crate::models::{NewProduct, Product};
use crate::stores::{AuthStore, CatalogStore, MessagesStore, OrdersStore};

/// Denial text shown to non-admin visitors of the back-office.
pub const ACCESS_DENIED: &str = "You need admin privileges to access this page.";

/// The caller is not an administrator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct AdminAccessDenied(pub &'static str);

impl Default for AdminAccessDenied {
    fn default() -> Self {
        Self(ACCESS_DENIED)
    }
}

/// Why a back-office operation did not complete.
#[derive(Debug, Error)]
pub enum BackOfficeError {
    #[error(transparent)]
    Denied(#[from] AdminAccessDenied),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// The gated admin surface.
pub struct BackOffice {
    auth: Arc<AuthStore>,
    catalog: Arc<CatalogStore>,
    orders: Arc<OrdersStore>,
    messages: Arc<MessagesStore>,
}

impl BackOffice {
    pub fn new(
        auth: Arc<AuthStore>,
        catalog: Arc<CatalogStore>,
        orders: Arc<OrdersStore>,
        messages: Arc<MessagesStore>,
    ) -> Self {
        Self {
            auth,
            catalog,
            orders,
            messages,
        }
    }

    fn ensure_admin(&self) -> Result<(), AdminAccessDenied> {
        if self.auth.is_admin() {
            Ok(())
        } else {
            Err(AdminAccessDenied::default())
        }
    }

    /// Create a catalog product.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_product(&self, draft: NewProduct) -> Result<Product, BackOfficeError> {
        self.ensure_admin()?;
        Ok(self.catalog.create(draft).await?)
    }

    /// Overwrite a catalog product.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn update_product(&self, product: Product) -> Result<(), BackOfficeError> {
        self.ensure_admin()?;
        Ok(self.catalog.update(product).await?)
    }

    /// Delete a catalog product.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, id: &ProductId) -> Result<(), BackOfficeError> {
        self.ensure_admin()?;
        Ok(self.catalog.remove(id).await?)
    }

    /// Reload the order list.
    #[instrument(skip(self))]
    pub async fn refresh_orders(&self) -> Result<(), BackOfficeError> {
        self.ensure_admin()?;
        Ok(self.orders.fetch_all().await?)
    }

    /// Move an order through its lifecycle.
    #[instrument(skip(self))]
    pub async fn set_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), BackOfficeError> {
        self.ensure_admin()?;
        Ok(self.orders.update_status(id, status).await?)
    }

    /// Force-cancel an order (a status rewrite, never a delete).
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: &OrderId) -> Result<(), BackOfficeError> {
        self.ensure_admin()?;
        Ok(self.orders.remove(id).await?)
    }

    /// Reload the contact-message list.
    #[instrument(skip(self))]
    pub async fn refresh_messages(&self) -> Result<(), BackOfficeError> {
        self.ensure_admin()?;
        Ok(self.messages.fetch_all().await?)
    }

    /// Delete a contact message.
    #[instrument(skip(self))]
    pub async fn remove_message(&self, id: &MessageId) -> Result<(), BackOfficeError> {
        self.ensure_admin()?;
        Ok(self.messages.remove(id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sable_core::{Category, Email, Price};

    use crate::Storefront;
    use crate::backend::{MemoryBackend, NewAccount};

    use super::*;

    fn draft() -> NewProduct {
        NewProduct {
            title: "Overshirt".to_owned(),
            category: Category::Outerwear,
            price: Price::new("$120"),
            description: None,
            images: vec!["https://cdn.example/overshirt.jpg".to_owned()],
        }
    }

    fn account(email: &str) -> NewAccount {
        NewAccount {
            email: Email::parse(email).unwrap(),
            password: "hunter2hunter2".to_owned(),
            first_name: None,
            last_name: None,
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn test_non_admin_is_denied_and_nothing_changes() {
        let backend = std::sync::Arc::new(MemoryBackend::new());
        let front = Storefront::new(backend.clone());
        front.auth.sign_up(account("jo@example.com")).await.unwrap();

        let office = front.back_office();
        let result = office.create_product(draft()).await;

        match result {
            Err(BackOfficeError::Denied(denied)) => assert_eq!(denied.0, ACCESS_DENIED),
            other => panic!("expected denial, got {other:?}"),
        }
        assert!(front.catalog.items().is_empty());
        assert!(backend.stored_products().is_empty());
        assert!(front.catalog.error().is_none());
    }

    #[tokio::test]
    async fn test_anonymous_is_denied() {
        let backend = std::sync::Arc::new(MemoryBackend::new());
        let front = Storefront::new(backend);

        let office = front.back_office();
        assert!(office.refresh_orders().await.is_err());
    }

    #[tokio::test]
    async fn test_admin_passes_the_gate() {
        let backend = std::sync::Arc::new(MemoryBackend::new());
        let front = Storefront::new(backend);
        front.auth.sign_up(account("admin@example.com")).await.unwrap();

        let office = front.back_office();
        let product = office.create_product(draft()).await.unwrap();

        assert_eq!(front.catalog.items().len(), 1);

        office.remove_product(&product.id).await.unwrap();
        assert!(front.catalog.items().is_empty());
    }
}
