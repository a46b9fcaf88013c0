//! State containers.
//!
//! Each store is split in two, the way the UI consumes it:
//!
//! - a pure state struct (`CartState`, `CatalogState`, ...) whose methods
//!   are synchronous reducer-style transitions, unit-testable without a
//!   runtime;
//! - a container (`CartStore`, `CatalogStore`, ...) that owns the state
//!   behind a lock plus the backend trait objects, and runs the async
//!   effects.
//!
//! Containers are `Send + Sync` and shared by `Arc`. Every backend failure
//! is converted to the store's error field at this boundary; the same
//! failure is also returned to the caller so flows can react to it.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod messages;
pub mod orders;

pub use auth::{AuthState, AuthStore};
pub use cart::{CartLine, CartState, CartStore};
pub use catalog::{CatalogState, CatalogStore};
pub use messages::{MessagesState, MessagesStore};
pub use orders::{OrdersState, OrdersStore};
