//! Domain models for the storefront.
//!
//! These are the persisted shapes: every type here round-trips through JSON
//! unchanged.

pub mod order;
pub mod product;

pub use order::{CartItems, Customer, CustomerField, CustomerInfo, Order};
pub use product::{Product, ProductFields, ProductInput};
