//! In-memory backend for tests and offline development.
//!
//! Implements every platform trait over plain maps and vectors, assigning
//! uuid ids and wall-clock timestamps. Each surface can be switched into a
//! failing state to exercise the stores' error paths.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use async_trait::async_trait;

use sable_core::{Email, MessageId, OrderId, OrderStatus, ProductId, UserId};

use crate::models::{
    ContactMessage, NewMessage, NewProduct, Order, OrderDraft, Product, UserProfile,
    user::split_display_name,
};

use super::{
    AuthApi, AuthenticatedUser, BackendError, CatalogApi, MessagesApi, NewAccount, OrdersApi,
    SessionHandle, StorageApi, UsersApi,
};

/// One backend surface, for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Auth,
    Catalog,
    Orders,
    Users,
    Messages,
    Storage,
}

/// The identity the external OAuth provider would hand back.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub email: Email,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    password: Option<String>,
}

#[derive(Default)]
struct State {
    products: Vec<Product>,
    orders: Vec<Order>,
    messages: Vec<ContactMessage>,
    profiles: HashMap<String, UserProfile>,
    accounts: HashMap<String, Account>,
    provider_identity: Option<ProviderIdentity>,
    blobs: HashMap<String, Vec<u8>>,
    failing: HashSet<Surface>,
}

/// In-memory implementation of the full platform surface.
///
/// Cheaply cloneable; clones share state and the session channel.
#[derive(Clone)]
pub struct MemoryBackend {
    inner: Arc<MemoryBackendInner>,
}

struct MemoryBackendInner {
    state: Mutex<State>,
    session: watch::Sender<Option<SessionHandle>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            inner: Arc::new(MemoryBackendInner {
                state: Mutex::new(State::default()),
                session,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn assign_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn check(state: &State, surface: Surface) -> Result<(), BackendError> {
        if state.failing.contains(&surface) {
            return Err(BackendError::Unavailable(format!(
                "{surface:?} surface is offline"
            )));
        }
        Ok(())
    }

    fn publish_session(&self, session: Option<SessionHandle>) {
        let _ = self.inner.session.send_replace(session);
    }

    /// Make every call on the given surface fail until [`restore`](Self::restore).
    pub fn fail(&self, surface: Surface) {
        self.lock().failing.insert(surface);
    }

    /// Undo [`fail`](Self::fail) for the given surface.
    pub fn restore(&self, surface: Surface) {
        self.lock().failing.remove(&surface);
    }

    /// Configure what the external OAuth provider hands back.
    pub fn set_provider_identity(&self, email: Email, display_name: Option<String>) {
        self.lock().provider_identity = Some(ProviderIdentity {
            email,
            display_name,
        });
    }

    /// Every stored order, in insertion order (test helper).
    #[must_use]
    pub fn stored_orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    /// Every stored product, in insertion order (test helper).
    #[must_use]
    pub fn stored_products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Every stored message, in insertion order (test helper).
    #[must_use]
    pub fn stored_messages(&self) -> Vec<ContactMessage> {
        self.lock().messages.clone()
    }

    /// The stored profile document for an account (test helper).
    #[must_use]
    pub fn stored_profile(&self, id: &UserId) -> Option<UserProfile> {
        self.lock().profiles.get(id.as_str()).cloned()
    }

    /// Drop an account's profile document, leaving the account itself
    /// behind (test helper for the missing-profile path).
    pub fn remove_profile(&self, id: &UserId) {
        self.lock().profiles.remove(id.as_str());
    }

    fn profile_or_backfill(
        state: &mut State,
        user_id: &str,
        email: &Email,
        display_name: Option<&str>,
    ) -> UserProfile {
        if let Some(profile) = state.profiles.get(user_id) {
            return profile.clone();
        }

        let (first_name, last_name) = split_display_name(display_name);
        let profile =
            UserProfile::for_new_account(email.clone(), first_name, last_name, None, Utc::now());
        state.profiles.insert(user_id.to_owned(), profile.clone());
        profile
    }
}

#[async_trait]
impl AuthApi for MemoryBackend {
    async fn sign_up(&self, account: NewAccount) -> Result<AuthenticatedUser, BackendError> {
        let handle;
        let user;
        {
            let mut state = self.lock();
            Self::check(&state, Surface::Auth)?;

            let key = account.email.as_str().to_lowercase();
            if state.accounts.contains_key(&key) {
                return Err(BackendError::AlreadyExists);
            }

            let user_id = Self::assign_id();
            state.accounts.insert(
                key,
                Account {
                    user_id: user_id.clone(),
                    password: Some(account.password),
                },
            );

            let profile = UserProfile::for_new_account(
                account.email.clone(),
                account.first_name,
                account.last_name,
                account.phone_number,
                Utc::now(),
            );
            state.profiles.insert(user_id.clone(), profile.clone());

            handle = SessionHandle {
                user_id: UserId::new(user_id.clone()),
                email: account.email,
            };
            user = AuthenticatedUser {
                id: UserId::new(user_id),
                profile,
            };
        }

        self.publish_session(Some(handle));
        Ok(user)
    }

    async fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthenticatedUser, BackendError> {
        let handle;
        let user;
        {
            let mut state = self.lock();
            Self::check(&state, Surface::Auth)?;

            let key = email.as_str().to_lowercase();
            let account = state
                .accounts
                .get(&key)
                .cloned()
                .ok_or(BackendError::InvalidCredentials)?;

            if account.password.as_deref() != Some(password) {
                return Err(BackendError::InvalidCredentials);
            }

            let profile = Self::profile_or_backfill(&mut state, &account.user_id, email, None);

            handle = SessionHandle {
                user_id: UserId::new(account.user_id.clone()),
                email: profile.email.clone(),
            };
            user = AuthenticatedUser {
                id: UserId::new(account.user_id),
                profile,
            };
        }

        self.publish_session(Some(handle));
        Ok(user)
    }

    async fn sign_in_with_provider(&self) -> Result<AuthenticatedUser, BackendError> {
        let handle;
        let user;
        {
            let mut state = self.lock();
            Self::check(&state, Surface::Auth)?;

            let identity = state.provider_identity.clone().ok_or_else(|| {
                BackendError::Unavailable("no provider identity configured".to_owned())
            })?;

            let key = identity.email.as_str().to_lowercase();
            let user_id = if let Some(account) = state.accounts.get(&key) {
                account.user_id.clone()
            } else {
                let user_id = Self::assign_id();
                state.accounts.insert(
                    key,
                    Account {
                        user_id: user_id.clone(),
                        password: None,
                    },
                );
                user_id
            };

            let profile = Self::profile_or_backfill(
                &mut state,
                &user_id,
                &identity.email,
                identity.display_name.as_deref(),
            );

            handle = SessionHandle {
                user_id: UserId::new(user_id.clone()),
                email: profile.email.clone(),
            };
            user = AuthenticatedUser {
                id: UserId::new(user_id),
                profile,
            };
        }

        self.publish_session(Some(handle));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        {
            let state = self.lock();
            Self::check(&state, Surface::Auth)?;
        }
        self.publish_session(None);
        Ok(())
    }

    fn session_changes(&self) -> watch::Receiver<Option<SessionHandle>> {
        self.inner.session.subscribe()
    }
}

#[async_trait]
impl CatalogApi for MemoryBackend {
    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let state = self.lock();
        Self::check(&state, Surface::Catalog)?;
        // Newest first, matching the hosted API's createdAt-descending order.
        Ok(state.products.iter().rev().cloned().collect())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, BackendError> {
        let state = self.lock();
        Self::check(&state, Surface::Catalog)?;
        Ok(state.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn insert_product(&self, draft: NewProduct) -> Result<Product, BackendError> {
        let mut state = self.lock();
        Self::check(&state, Surface::Catalog)?;

        let now = Utc::now();
        let product = Product {
            id: ProductId::new(Self::assign_id()),
            title: draft.title,
            category: draft.category,
            price: draft.price,
            description: draft.description,
            images: draft.images,
            created_at: now,
            updated_at: now,
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: &ProductId, draft: NewProduct) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::check(&state, Surface::Catalog)?;

        let product = state
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("products/{id}")))?;

        product.title = draft.title;
        product.category = draft.category;
        product.price = draft.price;
        product.description = draft.description;
        product.images = draft.images;
        product.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::check(&state, Surface::Catalog)?;
        state.products.retain(|p| &p.id != id);
        Ok(())
    }
}

#[async_trait]
impl OrdersApi for MemoryBackend {
    async fn list_orders(&self) -> Result<Vec<Order>, BackendError> {
        let state = self.lock();
        Self::check(&state, Surface::Orders)?;
        Ok(state.orders.iter().rev().cloned().collect())
    }

    async fn insert_order(&self, draft: OrderDraft) -> Result<Order, BackendError> {
        let mut state = self.lock();
        Self::check(&state, Surface::Orders)?;

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(Self::assign_id()),
            user_id: draft.user_id,
            is_guest: draft.is_guest,
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            customer_phone: draft.customer_phone,
            customer_address: draft.customer_address,
            items: draft.items,
            total_amount: draft.total_amount,
            status: draft.status,
            created_at: now,
            updated_at: now,
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn set_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::check(&state, Surface::Orders)?;

        let order = state
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| BackendError::NotFound(format!("orders/{id}")))?;

        order.status = status;
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn cancel_order(&self, id: &OrderId) -> Result<(), BackendError> {
        self.set_order_status(id, OrderStatus::Cancelled).await
    }
}

#[async_trait]
impl UsersApi for MemoryBackend {
    async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, BackendError> {
        let state = self.lock();
        Self::check(&state, Surface::Users)?;
        Ok(state.profiles.get(id.as_str()).cloned())
    }

    async fn put_profile(&self, id: &UserId, profile: &UserProfile) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::check(&state, Surface::Users)?;
        state
            .profiles
            .insert(id.as_str().to_owned(), profile.clone());
        Ok(())
    }
}

#[async_trait]
impl MessagesApi for MemoryBackend {
    async fn list_messages(&self) -> Result<Vec<ContactMessage>, BackendError> {
        let state = self.lock();
        Self::check(&state, Surface::Messages)?;
        Ok(state.messages.iter().rev().cloned().collect())
    }

    async fn insert_message(&self, draft: NewMessage) -> Result<ContactMessage, BackendError> {
        let mut state = self.lock();
        Self::check(&state, Surface::Messages)?;

        let message = ContactMessage {
            id: MessageId::new(Self::assign_id()),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            subject: draft.subject,
            message: draft.message,
            is_read: false,
            created_at: Utc::now(),
        };
        state.messages.push(message.clone());
        Ok(message)
    }

    async fn delete_message(&self, id: &MessageId) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::check(&state, Surface::Messages)?;
        state.messages.retain(|m| &m.id != id);
        Ok(())
    }
}

#[async_trait]
impl StorageApi for MemoryBackend {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, BackendError> {
        let mut state = self.lock();
        Self::check(&state, Surface::Storage)?;

        let url = format!("memory://blobs/{path}");
        state.blobs.insert(url.clone(), bytes);
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::check(&state, Surface::Storage)?;
        state.blobs.remove(url);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sable_core::{Category, Price};

    use crate::models::NewProduct;

    use super::*;

    fn tee() -> NewProduct {
        NewProduct {
            title: "Boxy Tee".to_owned(),
            category: Category::Essentials,
            price: Price::new("$45"),
            description: None,
            images: vec!["https://cdn.example/tee.jpg".to_owned()],
        }
    }

    #[tokio::test]
    async fn test_failure_injection_is_per_surface() {
        let backend = MemoryBackend::new();
        backend.fail(Surface::Catalog);

        assert!(matches!(
            backend.insert_product(tee()).await,
            Err(BackendError::Unavailable(_))
        ));
        // Other surfaces keep working.
        assert!(backend.list_orders().await.is_ok());

        backend.restore(Surface::Catalog);
        assert!(backend.insert_product(tee()).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let backend = MemoryBackend::new();
        backend.insert_product(tee()).await.unwrap();
        let mut second = tee();
        second.title = "Overshirt".to_owned();
        backend.insert_product(second).await.unwrap();

        let listed = backend.list_products().await.unwrap();
        assert_eq!(listed[0].title, "Overshirt");
        assert_eq!(listed[1].title, "Boxy Tee");
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let backend = MemoryBackend::new();
        let result = backend
            .update_product(&ProductId::new("ghost"), tee())
            .await;
        assert!(matches!(result, Err(BackendError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_storage_upload_and_delete() {
        let backend = MemoryBackend::new();

        let url = backend
            .upload("products/tee.jpg", vec![0xFF, 0xD8])
            .await
            .unwrap();
        assert!(url.ends_with("products/tee.jpg"));

        backend.delete(&url).await.unwrap();

        backend.fail(Surface::Storage);
        assert!(backend.upload("x", Vec::new()).await.is_err());
    }
}
