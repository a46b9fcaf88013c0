//! Orders and their checkout-time line snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sable_core::{Category, OrderId, OrderStatus, Price, ProductId, UserId};

/// Number of id characters in a customer-facing order reference.
const REFERENCE_LEN: usize = 8;

/// One purchased line, snapshotted at checkout time.
///
/// A copy of the cart line's product fields, deliberately decoupled from
/// the live catalog: later edits or deletion of the product do not change
/// historical orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub title: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    /// The product's primary image at checkout time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: Category,
}

/// An order in the `orders` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Backend-assigned identifier.
    pub id: OrderId,
    /// The purchasing account; `None` for guest checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub is_guest: bool,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    pub items: Vec<OrderItem>,
    /// Display-string total computed at checkout.
    pub total_amount: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Short customer-facing reference derived from the backend id.
    #[must_use]
    pub fn reference(&self) -> String {
        self.id
            .as_str()
            .chars()
            .take(REFERENCE_LEN)
            .collect::<String>()
            .to_uppercase()
    }
}

/// Fields for submitting a new order. The backend assigns the id and
/// maintains the timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub is_guest: bool,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: Price,
    pub status: OrderStatus,
}
