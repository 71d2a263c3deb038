//! Storefront state owned by the host.
//!
//! [`Storefront`] is constructed once at startup and handed to whatever
//! drives the UI. It owns the catalog, cart and order log and exposes every
//! operation the host needs; there is no ambient global state.

use std::sync::Arc;

use devshop_core::{CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::cart::CartLedger;
use crate::catalog::CatalogRepository;
use crate::config::{StorageKeys, StorefrontConfig};
use crate::error::Result;
use crate::models::{CartItems, CustomerInfo, Order, Product, ProductInput};
use crate::orders::OrderLog;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage, PersistentStore};
use crate::views::{self, CartView, OrderSummary, SortKey};

/// Catalog, cart and order state for one shopper on one device.
#[derive(Debug)]
pub struct Storefront {
    catalog: CatalogRepository,
    cart: CartLedger,
    orders: OrderLog,
    shipping_fee: Price,
    currency: CurrencyCode,
}

impl Storefront {
    /// Open the storefront described by `config`.
    ///
    /// Uses file storage when `config.storage_dir` is set, memory otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created or the
    /// seed catalog cannot be written.
    pub fn open(config: &StorefrontConfig) -> Result<Self> {
        let backend: Arc<dyn KeyValueStorage> = match &config.storage_dir {
            Some(dir) => Arc::new(FileStorage::open(dir)?),
            None => Arc::new(MemoryStorage::new()),
        };
        Self::with_store(PersistentStore::new(backend), config)
    }

    /// Load all state from an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed catalog cannot be written.
    #[instrument(skip_all)]
    pub fn with_store(store: PersistentStore, config: &StorefrontConfig) -> Result<Self> {
        let StorageKeys {
            products,
            cart,
            orders,
        } = &config.keys;

        let catalog = CatalogRepository::load_or_seed(store.clone(), products)?;
        let cart = CartLedger::load(store.clone(), cart);
        let orders = OrderLog::load(store, orders);

        tracing::info!(
            products = catalog.products().len(),
            cart_items = cart.count(),
            orders = orders.len(),
            "Storefront state loaded"
        );

        Ok(Self {
            catalog,
            cart,
            orders,
            shipping_fee: config.shipping_fee,
            currency: config.currency,
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.catalog.products()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.catalog.get(id)
    }

    /// Category filter values, `"all"` first.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.catalog.categories()
    }

    /// Create or edit a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be persisted.
    pub fn upsert_product(&mut self, input: &ProductInput) -> Result<Product> {
        Ok(self.catalog.upsert(input)?)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Current cart entries.
    #[must_use]
    pub const fn cart_items(&self) -> &CartItems {
        self.cart.items()
    }

    /// Add units of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn add_to_cart(&mut self, id: &ProductId, quantity: u32) -> Result<()> {
        Ok(self.cart.add(id, quantity)?)
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Result<()> {
        Ok(self.cart.remove(id)?)
    }

    /// Adjust a cart entry by `delta` units.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn change_quantity(&mut self, id: &ProductId, delta: i64) -> Result<()> {
        Ok(self.cart.change_quantity(id, delta)?)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<()> {
        Ok(self.cart.clear()?)
    }

    /// Cart total against the current catalog.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart.total(self.catalog.products())
    }

    /// Number of units in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order for the current cart, then empty the cart.
    ///
    /// The cart is cleared before the order is recorded, and restored if
    /// recording fails, so an order is never persisted while its items stay
    /// in the cart.
    ///
    /// # Errors
    ///
    /// Returns a validation error (with cart and log untouched) if a
    /// customer field is blank or the cart is empty. Returns a storage error
    /// if the cart cannot be cleared or the order cannot be persisted; no
    /// order is recorded in either case.
    #[instrument(skip_all)]
    pub fn place_order(&mut self, customer: &CustomerInfo) -> Result<Order> {
        let order = self
            .orders
            .prepare(customer, self.cart.items(), self.catalog.products())?;
        let items = self.cart.snapshot();

        self.cart.clear()?;
        if let Err(e) = self.orders.record(order.clone()) {
            if let Err(restore) = self.cart.restore(items) {
                tracing::error!(error = %restore, "Failed to restore cart after failed order");
            }
            return Err(e.into());
        }
        Ok(order)
    }

    /// All placed orders, oldest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        self.orders.list()
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Products to show for the given filters.
    #[must_use]
    pub fn filter_and_sort(
        &self,
        category: Option<&str>,
        search: &str,
        sort: Option<SortKey>,
    ) -> Vec<&Product> {
        views::filter_and_sort(self.catalog.products(), category, search, sort)
    }

    /// Resolved cart lines and subtotal.
    #[must_use]
    pub fn cart_view(&self) -> CartView<'_> {
        views::cart_view(self.cart.items(), self.catalog.products())
    }

    /// Checkout summary with an explicit shipping fee.
    #[must_use]
    pub fn order_summary_with_fee(&self, shipping_fee: Price) -> OrderSummary<'_> {
        views::order_summary(self.cart.items(), self.catalog.products(), shipping_fee)
    }

    /// Checkout summary with the configured shipping fee.
    #[must_use]
    pub fn order_summary(&self) -> OrderSummary<'_> {
        self.order_summary_with_fee(self.shipping_fee)
    }

    /// Currency used for display.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Format an amount in the configured currency.
    #[must_use]
    pub fn format_amount(&self, amount: Decimal) -> String {
        self.currency.format(amount)
    }
}
