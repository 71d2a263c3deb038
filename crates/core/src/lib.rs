//! DevShop Core - Shared types library.
//!
//! This crate provides common types used across all DevShop components:
//! - `storefront` - Catalog, cart and order engine over durable key-value storage
//! - `cli` - Terminal host driving the storefront engine
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
