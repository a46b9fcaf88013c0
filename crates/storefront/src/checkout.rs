//! Checkout flow.
//!
//! Orchestrates one purchase: read the cart, validate the contact details,
//! snapshot the lines into an order, submit it, and clear the cart. Steps
//! run in that order with no partial-completion recovery; a failed submit
//! leaves the cart intact so the same details can simply be submitted
//! again.
//!
//! There is no idempotency key: a second submit racing the first can
//! create two orders for one cart.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use sable_core::{Email, OrderId, OrderStatus, Phone, Price};

use crate::models::{AuthUser, OrderDraft, OrderItem};
use crate::stores::{AuthStore, CartLine, CartStore, OrdersStore};

/// How long the order confirmation stays up before auto-dismissing.
pub const CONFIRMATION_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// Contact fields collected before an order is placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ContactDetails {
    /// Prefill from the signed-in user's profile.
    ///
    /// The profile has no delivery address, so that field starts blank and
    /// validation will ask for it.
    #[must_use]
    pub fn from_profile(user: &AuthUser) -> Self {
        Self {
            name: user.display_name().unwrap_or_default(),
            email: user.email.as_str().to_owned(),
            phone: user.phone_number.clone().unwrap_or_default(),
            address: String::new(),
        }
    }

    /// Validate every field, collecting field-level error text.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is blank, the email
    /// fails the shape check, or the phone has fewer than ten digits.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.name.trim().is_empty() {
            errors.name = Some("Name is required".to_owned());
        }

        if self.email.trim().is_empty() {
            errors.email = Some("Email is required".to_owned());
        } else if Email::parse(self.email.trim()).is_err() {
            errors.email = Some("Please enter a valid email".to_owned());
        }

        if self.phone.trim().is_empty() {
            errors.phone = Some("Phone number is required".to_owned());
        } else if Phone::parse(&self.phone).is_err() {
            errors.phone = Some("Please enter a valid phone number".to_owned());
        }

        if self.address.trim().is_empty() {
            errors.address = Some("Address is required".to_owned());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Field-level validation errors, one optional message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.address.is_none()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = [&self.name, &self.email, &self.phone, &self.address]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Why a checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The bag was empty; nothing was sent to the backend.
    #[error("the bag is empty")]
    EmptyCart,

    /// Contact validation failed; nothing was sent to the backend and the
    /// cart is untouched.
    #[error("invalid contact details: {0}")]
    Invalid(FieldErrors),

    /// The backend rejected the order. The cart is untouched; submitting
    /// the same details again retries.
    #[error("order submission failed: {0}")]
    Submit(String),
}

/// A placed order's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub order_id: OrderId,
    /// Short reference shown to the customer: the first eight characters
    /// of the backend-assigned id, uppercased.
    pub order_ref: String,
}

/// The checkout orchestration over the cart, orders, and auth stores.
pub struct CheckoutFlow {
    cart: Arc<CartStore>,
    orders: Arc<OrdersStore>,
    auth: Arc<AuthStore>,
}

impl CheckoutFlow {
    pub fn new(cart: Arc<CartStore>, orders: Arc<OrdersStore>, auth: Arc<AuthStore>) -> Self {
        Self { cart, orders, auth }
    }

    /// Contact details to start the form with: the signed-in profile's
    /// fields, or all blank for a guest.
    #[must_use]
    pub fn prefill(&self) -> ContactDetails {
        self.auth
            .current_user()
            .map(|user| ContactDetails::from_profile(&user))
            .unwrap_or_default()
    }

    /// Place an order for the current cart contents.
    ///
    /// On success the cart is cleared and the confirmation returned. On
    /// failure the cart is left exactly as it was; calling `submit` again
    /// with the same details retries from the snapshot step.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::EmptyCart`] and [`CheckoutError::Invalid`] abort
    /// before any backend call; [`CheckoutError::Submit`] carries the
    /// backend's message.
    #[instrument(skip(self, details))]
    pub async fn submit(&self, details: &ContactDetails) -> Result<Confirmation, CheckoutError> {
        let lines = self.cart.snapshot().lines;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        details.validate().map_err(CheckoutError::Invalid)?;

        let draft = self.build_draft(&lines, details);
        let order = self
            .orders
            .create(draft)
            .await
            .map_err(|e| CheckoutError::Submit(e.to_string()))?;

        self.cart.clear();

        tracing::info!(order = %order.id, "order placed");
        Ok(Confirmation {
            order_ref: order.reference(),
            order_id: order.id,
        })
    }

    /// Wait the fixed confirmation delay, then close the cart panel.
    pub async fn auto_dismiss(&self, _confirmation: &Confirmation) {
        tokio::time::sleep(CONFIRMATION_DISMISS_AFTER).await;
        self.cart.close();
    }

    fn build_draft(&self, lines: &[CartLine], details: &ContactDetails) -> OrderDraft {
        let user = self.auth.current_user();
        let total: f64 = lines.iter().map(CartLine::line_total).sum();
        let address = details.address.trim();

        OrderDraft {
            user_id: user.as_ref().map(|u| u.id.clone()),
            is_guest: user.is_none(),
            customer_name: details.name.trim().to_owned(),
            customer_email: details.email.trim().to_owned(),
            customer_phone: details.phone.trim().to_owned(),
            customer_address: if address.is_empty() {
                None
            } else {
                Some(address.to_owned())
            },
            items: lines.iter().map(snapshot_line).collect(),
            total_amount: Price::format(total),
            status: OrderStatus::Pending,
        }
    }
}

/// Copy a cart line into its order snapshot, decoupled from the live
/// product.
fn snapshot_line(line: &CartLine) -> OrderItem {
    OrderItem {
        product_id: line.product.id.clone(),
        title: line.product.title.clone(),
        price: line.product.price.clone(),
        quantity: line.quantity,
        selected_size: line.selected_size.clone(),
        image: line.product.primary_image().map(str::to_owned),
        category: line.product.category,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use sable_core::{Category, ProductId};

    use crate::backend::MemoryBackend;
    use crate::backend::memory::Surface;
    use crate::models::Product;

    use super::*;

    fn product(id: &str, price: &str) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            category: Category::Streetwear,
            price: Price::new(price),
            description: None,
            images: vec![format!("https://cdn.example/{id}.jpg")],
            created_at: now,
            updated_at: now,
        }
    }

    fn guest_details() -> ContactDetails {
        ContactDetails {
            name: "Jo Field".to_owned(),
            email: "jo@example.com".to_owned(),
            phone: "+1 (555) 000-1234".to_owned(),
            address: "12 Canal St, Rotterdam".to_owned(),
        }
    }

    fn flow() -> (Arc<MemoryBackend>, Arc<CartStore>, CheckoutFlow) {
        let backend = Arc::new(MemoryBackend::new());
        let cart = Arc::new(CartStore::new());
        let orders = Arc::new(OrdersStore::new(backend.clone()));
        let auth = Arc::new(AuthStore::new(backend.clone(), backend.clone()));
        let flow = CheckoutFlow::new(cart.clone(), orders, auth);
        (backend, cart, flow)
    }

    #[tokio::test]
    async fn test_empty_cart_never_writes() {
        let (backend, _, flow) = flow();

        let result = flow.submit(&guest_details()).await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert!(backend.stored_orders().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected_before_any_write() {
        let (backend, cart, flow) = flow();
        cart.add_line(&product("tee", "$45"), None);

        let details = ContactDetails {
            email: "not-an-email".to_owned(),
            ..guest_details()
        };
        let result = flow.submit(&details).await;

        match result {
            Err(CheckoutError::Invalid(errors)) => {
                assert_eq!(errors.email.as_deref(), Some("Please enter a valid email"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert!(backend.stored_orders().is_empty());
        assert_eq!(cart.line_count(), 1);
    }

    #[tokio::test]
    async fn test_short_phone_rejected_before_any_write() {
        let (backend, cart, flow) = flow();
        cart.add_line(&product("tee", "$45"), None);

        let details = ContactDetails {
            phone: "555-0012".to_owned(),
            ..guest_details()
        };
        let result = flow.submit(&details).await;

        match result {
            Err(CheckoutError::Invalid(errors)) => {
                assert_eq!(
                    errors.phone.as_deref(),
                    Some("Please enter a valid phone number")
                );
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert!(backend.stored_orders().is_empty());
    }

    #[tokio::test]
    async fn test_blank_fields_collect_field_errors() {
        let (_, cart, flow) = flow();
        cart.add_line(&product("tee", "$45"), None);

        let result = flow.submit(&ContactDetails::default()).await;

        match result {
            Err(CheckoutError::Invalid(errors)) => {
                assert_eq!(errors.name.as_deref(), Some("Name is required"));
                assert_eq!(errors.email.as_deref(), Some("Email is required"));
                assert_eq!(errors.phone.as_deref(), Some("Phone number is required"));
                assert_eq!(errors.address.as_deref(), Some("Address is required"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart_and_writes_one_order() {
        let (backend, cart, flow) = flow();
        let a = product("a", "$50");
        let b = product("b", "$30");
        cart.add_line(&a, Some("M"));
        cart.add_line(&a, Some("M"));
        cart.add_line(&b, None);
        let lines_before = cart.line_count();

        let confirmation = flow.submit(&guest_details()).await.unwrap();

        assert!(cart.is_empty());
        let stored = backend.stored_orders();
        assert_eq!(stored.len(), 1);
        let order = &stored[0];
        assert_eq!(order.items.len(), lines_before);
        assert_eq!(order.total_amount, Price::new("$130.00"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.is_guest);
        assert!(order.user_id.is_none());

        // Snapshot fields come from the cart line, not the live product.
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].selected_size.as_deref(), Some("M"));
        assert_eq!(order.items[0].image.as_deref(), Some("https://cdn.example/a.jpg"));

        assert_eq!(confirmation.order_ref.len(), 8);
        assert_eq!(confirmation.order_ref, confirmation.order_ref.to_uppercase());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_cart_and_allows_retry() {
        let (backend, cart, flow) = flow();
        cart.add_line(&product("tee", "$45"), Some("L"));
        backend.fail(Surface::Orders);

        let details = guest_details();
        let result = flow.submit(&details).await;
        assert!(matches!(result, Err(CheckoutError::Submit(_))));
        assert_eq!(cart.line_count(), 1);
        assert!(backend.stored_orders().is_empty());

        // Retry with the same collected details once the backend is back.
        backend.restore(Surface::Orders);
        flow.submit(&details).await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(backend.stored_orders().len(), 1);
    }

    #[tokio::test]
    async fn test_signed_in_checkout_links_user() {
        let (backend, cart, flow) = flow();
        let account = crate::backend::NewAccount {
            email: Email::parse("jo@example.com").unwrap(),
            password: "hunter2hunter2".to_owned(),
            first_name: Some("Jo".to_owned()),
            last_name: Some("Field".to_owned()),
            phone_number: Some("+1 555 000 1234".to_owned()),
        };
        flow.auth.sign_up(account).await.unwrap();

        cart.add_line(&product("tee", "$45"), None);

        let mut details = flow.prefill();
        assert_eq!(details.name, "Jo Field");
        assert_eq!(details.email, "jo@example.com");
        // The profile carries no address; the customer supplies it.
        assert!(details.address.is_empty());
        details.address = "12 Canal St".to_owned();

        flow.submit(&details).await.unwrap();

        let order = &backend.stored_orders()[0];
        assert!(!order.is_guest);
        assert!(order.user_id.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_auto_dismiss_closes_cart() {
        let (_, cart, flow) = flow();
        cart.add_line(&product("tee", "$45"), None);
        cart.open();

        let confirmation = flow.submit(&guest_details()).await.unwrap();
        assert!(cart.is_open());

        flow.auto_dismiss(&confirmation).await;
        assert!(!cart.is_open());
    }
}
