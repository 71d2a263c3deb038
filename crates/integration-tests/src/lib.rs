//! Integration tests for DevShop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p devshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_flow` - end-to-end shopping flows on memory and file storage
//! - `storage_recovery` - corrupted and failing storage
//!
//! The helpers below build storefronts over each backend so every flow can be
//! exercised against both.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use devshop_storefront::Storefront;
use devshop_storefront::config::StorefrontConfig;
use devshop_storefront::models::CustomerInfo;
use devshop_storefront::storage::{FileStorage, PersistentStore, StorageError};

/// A store backed by files in `dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn file_store(dir: &Path) -> Result<PersistentStore, StorageError> {
    Ok(PersistentStore::new(Arc::new(FileStorage::open(dir)?)))
}

/// Open a storefront over `store` with default settings.
///
/// # Errors
///
/// Returns an error if the seed catalog cannot be written.
pub fn open(store: &PersistentStore) -> devshop_storefront::Result<Storefront> {
    Storefront::with_store(store.clone(), &StorefrontConfig::default())
}

/// Customer details that pass checkout validation.
#[must_use]
pub fn valid_customer() -> CustomerInfo {
    CustomerInfo {
        name: "A".to_string(),
        email: "a@x.com".to_string(),
        address: "addr".to_string(),
    }
}
