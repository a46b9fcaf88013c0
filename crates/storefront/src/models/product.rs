//! Catalog products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sable_core::{Category, Price, ProductId};

/// A product in the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend-assigned identifier.
    pub id: ProductId,
    pub title: String,
    pub category: Category,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered image URLs; the first is the primary image. Non-empty for
    /// any product the admin surface accepts.
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The primary (first) image URL, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// The mutable fields of this product, for a backend update.
    #[must_use]
    pub fn draft(&self) -> NewProduct {
        NewProduct {
            title: self.title.clone(),
            category: self.category,
            price: self.price.clone(),
            description: self.description.clone(),
            images: self.images.clone(),
        }
    }
}

/// Fields for creating or updating a product. The backend assigns the id
/// and maintains the timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub category: Category,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub images: Vec<String>,
}
