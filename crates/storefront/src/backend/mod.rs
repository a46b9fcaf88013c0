//! The external boundary: identity provider, document store, blob storage.
//!
//! Persistence and authentication are fully delegated to the hosted
//! platform. This module defines one trait per consumed boundary so the
//! stores can be wired to the real [`RestBackend`] in production and to
//! [`MemoryBackend`] in tests, plus the data shapes that cross the
//! boundary.

mod error;
pub mod memory;
pub mod rest;

pub use error::BackendError;
pub use memory::MemoryBackend;
pub use rest::RestBackend;

use async_trait::async_trait;
use tokio::sync::watch;

use sable_core::{Email, MessageId, OrderId, OrderStatus, ProductId, UserId};

use crate::models::{
    ContactMessage, NewMessage, NewProduct, Order, OrderDraft, Product, UserProfile,
};

/// Snapshot of the identity provider's current session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHandle {
    pub user_id: UserId,
    pub email: Email,
}

/// Fields collected at sign-up.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

/// A signed-in user together with their profile document.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub profile: UserProfile,
}

/// Identity provider boundary.
///
/// Credential handling, session validity, and token lifecycle live inside
/// the provider; this trait only mirrors its request/response surface.
/// Sign-in and sign-up resolve the profile document as part of the call
/// (creating it when the account predates profile storage).
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account and its profile document.
    async fn sign_up(&self, account: NewAccount) -> Result<AuthenticatedUser, BackendError>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &Email, password: &str)
    -> Result<AuthenticatedUser, BackendError>;

    /// Sign in through the external OAuth provider.
    async fn sign_in_with_provider(&self) -> Result<AuthenticatedUser, BackendError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Subscribe to session transitions.
    ///
    /// The receiver's current value is the provider's latest session
    /// snapshot; every auth transition publishes a new value.
    fn session_changes(&self) -> watch::Receiver<Option<SessionHandle>>;
}

/// Document-store boundary for the `products` collection.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// All products, newest first.
    async fn list_products(&self) -> Result<Vec<Product>, BackendError>;

    /// A single product by id.
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, BackendError>;

    /// Insert a product; the backend assigns the id.
    async fn insert_product(&self, draft: NewProduct) -> Result<Product, BackendError>;

    /// Overwrite a product's mutable fields.
    async fn update_product(&self, id: &ProductId, draft: NewProduct) -> Result<(), BackendError>;

    /// Delete a product document.
    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError>;
}

/// Document-store boundary for the `orders` collection.
///
/// Orders are never deleted: the closest thing to deletion is
/// [`cancel_order`](Self::cancel_order), which rewrites the status.
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// All orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, BackendError>;

    /// Insert an order; the backend assigns the id.
    async fn insert_order(&self, draft: OrderDraft) -> Result<Order, BackendError>;

    /// Partial update of the status and updated-at fields only.
    async fn set_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), BackendError>;

    /// Forced cancellation: a status rewrite, not a document delete.
    async fn cancel_order(&self, id: &OrderId) -> Result<(), BackendError>;
}

/// Document-store boundary for the `users` collection.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// The profile document for an account, if one exists.
    async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, BackendError>;

    /// Write a profile document under the account id.
    async fn put_profile(&self, id: &UserId, profile: &UserProfile) -> Result<(), BackendError>;
}

/// Document-store boundary for the `contact_messages` collection.
#[async_trait]
pub trait MessagesApi: Send + Sync {
    /// All messages, newest first.
    async fn list_messages(&self) -> Result<Vec<ContactMessage>, BackendError>;

    /// Insert a message; the backend assigns the id and sets it unread.
    async fn insert_message(&self, draft: NewMessage) -> Result<ContactMessage, BackendError>;

    /// Delete a message document.
    async fn delete_message(&self, id: &MessageId) -> Result<(), BackendError>;
}

/// Blob-storage boundary. Unused by the default storefront path but part
/// of the platform surface (product image uploads).
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Upload a blob and return its public URL.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, BackendError>;

    /// Delete a blob by its public URL.
    async fn delete(&self, url: &str) -> Result<(), BackendError>;
}

/// The full platform surface, for wiring every store to one backend.
pub trait Backend:
    AuthApi + CatalogApi + OrdersApi + UsersApi + MessagesApi + StorageApi
{
}

impl<T> Backend for T where
    T: AuthApi + CatalogApi + OrdersApi + UsersApi + MessagesApi + StorageApi
{
}
