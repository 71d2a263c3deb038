//! DevShop Storefront library.
//!
//! The state, persistence and view-derivation engine behind the storefront:
//! a product catalog, a shopping cart and a log of placed orders, each kept
//! as a JSON record in durable key-value storage.
//!
//! # Modules
//!
//! - [`storage`] - typed JSON records over a key-value backend, with
//!   corruption recovery
//! - [`catalog`] - product list, first-run seeding, create/edit
//! - [`cart`] - quantity ledger and totals
//! - [`orders`] - append-only order log
//! - [`views`] - filtering, sorting and cart/checkout projections
//! - [`state`] - the [`Storefront`] that owns all of the above

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod orders;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod views;

pub use error::{AppError, Result, ValidationError};
pub use state::Storefront;
