//! Sable Core - Shared types library.
//!
//! This crate provides common types used across all Sable components:
//! - `storefront` - The headless storefront client library
//! - `cli` - Command-line tools for catalog seeding and order management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no backend
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, phone
//!   numbers, categories, and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
