//! Core types for Sable.
//!
//! This module provides type-safe wrappers for common domain concepts.

mod category;
mod email;
mod id;
mod phone;
mod price;
mod status;

pub use category::{Category, CategoryError};
pub use email::{Email, EmailError};
pub use id::{MessageId, OrderId, ProductId, UserId};
pub use phone::{Phone, PhoneError};
pub use price::Price;
pub use status::{OrderStatus, OrderStatusError};
