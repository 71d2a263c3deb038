//! Catalog repository.
//!
//! Owns the product list. The list is seeded with a fixed default set the
//! first time it is loaded (or when the stored copy is unreadable), and is
//! persisted after every change.

use std::collections::HashSet;

use devshop_core::{Price, ProductId};
use tracing::instrument;

use crate::models::{Product, ProductInput};
use crate::storage::{Loaded, PersistentStore, StorageError, StoredRecord};

/// Synthetic category that matches every product.
pub const ALL_CATEGORIES: &str = "all";

impl StoredRecord for Vec<Product> {
    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.len());
        for product in self {
            if product.id.is_blank() {
                return Err("product with blank id".to_string());
            }
            if !seen.insert(product.id.as_str()) {
                return Err(format!("duplicate product id {}", product.id));
            }
        }
        Ok(())
    }
}

/// The built-in products installed on first run.
#[must_use]
pub fn default_products() -> Vec<Product> {
    let seed = |id: &str, name: &str, price: u32, category: &str, image: &str, description: &str| {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_units(price),
            category: category.to_string(),
            image: image.to_string(),
            description: description.to_string(),
        }
    };

    vec![
        seed(
            "p1",
            "Urban Runner Sneakers",
            2499,
            "Shoes",
            "images/sneakers.svg",
            "Lightweight, breathable sneakers built for city runs.",
        ),
        seed(
            "p2",
            "Aurora Headphones",
            3999,
            "Electronics",
            "images/headphones.svg",
            "Over-ear headphones with immersive audio & long battery life.",
        ),
        seed(
            "p3",
            "Minimalist Backpack",
            1999,
            "Bags",
            "images/backpack.svg",
            "Water-resistant backpack with organized compartments.",
        ),
        seed(
            "p4",
            "Classic Sunglasses",
            899,
            "Accessories",
            "images/sunglasses.svg",
            "UV-protected stylish sunglasses.",
        ),
    ]
}

/// Repository for the product catalog.
#[derive(Debug)]
pub struct CatalogRepository {
    store: PersistentStore,
    key: String,
    products: Vec<Product>,
}

impl CatalogRepository {
    /// Load the catalog, installing and persisting the default products if
    /// nothing valid is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the seed catalog cannot be written.
    #[instrument(skip(store))]
    pub fn load_or_seed(store: PersistentStore, key: &str) -> Result<Self, StorageError> {
        let products = match store.inspect::<Vec<Product>>(key) {
            Loaded::Found(products) => {
                tracing::debug!(count = products.len(), "Catalog loaded");
                products
            }
            Loaded::NotFound => {
                let seed = default_products();
                store.save(key, &seed)?;
                tracing::info!(count = seed.len(), "Catalog seeded with default products");
                seed
            }
            Loaded::Corrupt(reason) => {
                tracing::warn!(%reason, "Invalid products in storage, re-seeding");
                let seed = default_products();
                store.save(key, &seed)?;
                seed
            }
        };

        Ok(Self {
            store,
            key: key.to_string(),
            products,
        })
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Distinct non-empty categories in first-seen order, prefixed with
    /// [`ALL_CATEGORIES`].
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([ALL_CATEGORIES]);
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for product in &self.products {
            let category = product.category.as_str();
            if !category.is_empty() && seen.insert(category) {
                categories.push(category.to_string());
            }
        }
        categories
    }

    /// Create or edit a product.
    ///
    /// An `input.id` matching an existing product edits it in place, keeping
    /// its id and position. Otherwise a new product with a fresh id is
    /// inserted at the front of the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be persisted; the
    /// in-memory catalog is left unchanged in that case.
    #[instrument(skip(self, input), fields(product_id = ?input.id))]
    pub fn upsert(&mut self, input: &ProductInput) -> Result<Product, StorageError> {
        let fields = input.normalize();
        let mut next = self.products.clone();

        let existing = input
            .id
            .as_ref()
            .and_then(|id| next.iter_mut().find(|p| &p.id == id));

        let (saved, created) = if let Some(product) = existing {
            product.apply(fields);
            (product.clone(), false)
        } else {
            let product = Product::from_fields(self.fresh_id(), fields);
            next.insert(0, product.clone());
            (product, true)
        };

        self.store.save(&self.key, &next)?;
        self.products = next;

        tracing::info!(product_id = %saved.id, created, "Product saved");
        Ok(saved)
    }

    fn fresh_id(&self) -> ProductId {
        loop {
            let id = ProductId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
