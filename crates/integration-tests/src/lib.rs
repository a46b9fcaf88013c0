//! Integration tests for Sable.
//!
//! Cross-store scenarios run against the in-memory backend: the full
//! checkout flow, the admin back-office gate, the auth session lifecycle,
//! and the contact inbox.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sable-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sable_core::{Category, Email, Price};
use sable_storefront::Storefront;
use sable_storefront::backend::{MemoryBackend, NewAccount};
use sable_storefront::models::{NewProduct, Product};

/// A storefront wired to a fresh in-memory backend.
pub struct TestContext {
    pub backend: Arc<MemoryBackend>,
    pub front: Storefront,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let front = Storefront::new(backend.clone());
        Self { backend, front }
    }

    /// Sign up and stay signed in as an administrator account.
    ///
    /// # Panics
    ///
    /// Panics if sign-up fails (a test bug, not a scenario).
    pub async fn sign_in_admin(&self) {
        self.front
            .auth
            .sign_up(account("admin@sable.studio"))
            .await
            .expect("admin sign-up failed");
        assert!(self.front.auth.is_admin());
    }

    /// Sign up and stay signed in as a regular customer account.
    ///
    /// # Panics
    ///
    /// Panics if sign-up fails (a test bug, not a scenario).
    pub async fn sign_in_customer(&self, email: &str) {
        self.front
            .auth
            .sign_up(account(email))
            .await
            .expect("customer sign-up failed");
    }

    /// Put a product into the backend and return the stored record.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails (a test bug, not a scenario).
    pub async fn seed_product(&self, title: &str, price: &str) -> Product {
        use sable_storefront::backend::CatalogApi;

        self.backend
            .insert_product(NewProduct {
                title: title.to_owned(),
                category: Category::Essentials,
                price: Price::new(price),
                description: None,
                images: vec![format!(
                    "https://cdn.sable.studio/products/{}.jpg",
                    title.to_lowercase().replace(' ', "-")
                )],
            })
            .await
            .expect("seed insert failed")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Sign-up fields for a test account.
///
/// # Panics
///
/// Panics when the email literal is malformed.
#[must_use]
pub fn account(email: &str) -> NewAccount {
    NewAccount {
        email: Email::parse(email).expect("test email must parse"),
        password: "correct-horse-battery".to_owned(),
        first_name: Some("Jo".to_owned()),
        last_name: Some("Field".to_owned()),
        phone_number: Some("+1 (555) 000-1234".to_owned()),
    }
}
