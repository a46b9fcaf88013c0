//! Sable Storefront - headless storefront client library.
//!
//! This crate implements the client-side state of the Sable storefront:
//! product catalog, shopping bag, orders, authentication, and contact
//! messages, all backed by the hosted platform (document database, identity
//! provider, blob storage).
//!
//! # Architecture
//!
//! - [`backend`] - The external boundary: per-collection API traits, the
//!   REST client for the hosted platform, and an in-memory implementation
//!   for tests and offline development
//! - [`models`] - Domain records as stored in the backend collections
//! - [`stores`] - State containers: a pure state struct per store
//!   (reducer-style transitions) wrapped by a thread-safe container that
//!   owns the async backend calls
//! - [`checkout`] - Checkout orchestration: contact validation, order
//!   snapshot, submit, confirmation
//! - [`admin`] - The gated back-office facade over the stores
//!
//! The stores compose only through [`Storefront`]; none depends on
//! another's internals. UI layers hold `Arc`s to the stores they render
//! from and dispatch into them.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

pub mod admin;
pub mod backend;
pub mod checkout;
pub mod config;
pub mod models;
pub mod stores;

use backend::Backend;
use stores::{AuthStore, CartStore, CatalogStore, MessagesStore, OrdersStore};

/// The shared state container: every store of the storefront, wired to one
/// backend.
///
/// Cheaply cloneable; clones share the same stores.
#[derive(Clone)]
pub struct Storefront {
    /// Shopping bag (pure in-memory).
    pub cart: Arc<CartStore>,
    /// Product catalog, mirrored to the `products` collection.
    pub catalog: Arc<CatalogStore>,
    /// Orders, mirrored to the `orders` collection.
    pub orders: Arc<OrdersStore>,
    /// Session state mirrored from the identity provider.
    pub auth: Arc<AuthStore>,
    /// Contact messages, mirrored to the `contact_messages` collection.
    pub messages: Arc<MessagesStore>,
}

impl Storefront {
    /// Wire every store to the given backend.
    pub fn new<B>(backend: Arc<B>) -> Self
    where
        B: Backend + 'static,
    {
        Self {
            cart: Arc::new(CartStore::new()),
            catalog: Arc::new(CatalogStore::new(backend.clone())),
            orders: Arc::new(OrdersStore::new(backend.clone())),
            auth: Arc::new(AuthStore::new(backend.clone(), backend.clone())),
            messages: Arc::new(MessagesStore::new(backend)),
        }
    }

    /// Run the startup work: probe the session and load the catalog.
    ///
    /// The two calls run concurrently and each writes only its own store;
    /// there is no defined completion order between them.
    pub async fn bootstrap(&self) {
        let (catalog, ()) = tokio::join!(self.catalog.fetch_all(), self.auth.check_session());
        if let Err(e) = catalog {
            tracing::warn!("initial catalog fetch failed: {e}");
        }
    }

    /// Build a checkout flow over this storefront's stores.
    #[must_use]
    pub fn checkout(&self) -> checkout::CheckoutFlow {
        checkout::CheckoutFlow::new(self.cart.clone(), self.orders.clone(), self.auth.clone())
    }

    /// Build the admin back-office facade over this storefront's stores.
    #[must_use]
    pub fn back_office(&self) -> admin::BackOffice {
        admin::BackOffice::new(
            self.auth.clone(),
            self.catalog.clone(),
            self.orders.clone(),
            self.messages.clone(),
        )
    }
}
