//! Cart ledger.
//!
//! Tracks product id to quantity. Entries are only ever positive: an entry
//! whose quantity would drop to zero is removed instead. Entries may point at
//! products that are no longer in the catalog; such entries are skipped by
//! every total.

use devshop_core::ProductId;
use rust_decimal::Decimal;
use tracing::instrument;

use crate::models::{CartItems, Product};
use crate::storage::{Loaded, PersistentStore, StorageError, StoredRecord};

impl StoredRecord for CartItems {
    fn validate(&self) -> Result<(), String> {
        for (id, &quantity) in self {
            if id.is_blank() {
                return Err("cart entry with blank product id".to_string());
            }
            if quantity == 0 {
                return Err(format!("cart entry {id} has zero quantity"));
            }
        }
        Ok(())
    }
}

/// Sum of `price × quantity` over entries that resolve in `catalog`,
/// saturating at [`Decimal::MAX`].
#[must_use]
pub fn cart_total(items: &CartItems, catalog: &[Product]) -> Decimal {
    items
        .iter()
        .filter_map(|(id, &quantity)| {
            catalog
                .iter()
                .find(|p| &p.id == id)
                .map(|p| p.price.line_total(quantity))
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// The shopping cart, persisted after every change.
#[derive(Debug)]
pub struct CartLedger {
    store: PersistentStore,
    key: String,
    items: CartItems,
}

impl CartLedger {
    /// Load the cart, starting empty if nothing valid is stored.
    #[instrument(skip(store))]
    pub fn load(store: PersistentStore, key: &str) -> Self {
        let items = match store.inspect::<CartItems>(key) {
            Loaded::Found(items) => items,
            Loaded::NotFound => CartItems::new(),
            Loaded::Corrupt(reason) => {
                tracing::warn!(%reason, "Invalid cart in storage, starting empty");
                CartItems::new()
            }
        };

        Self {
            store,
            key: key.to_string(),
            items,
        }
    }

    /// Current entries in insertion order.
    #[must_use]
    pub const fn items(&self) -> &CartItems {
        &self.items
    }

    /// Quantity of a product, if present.
    #[must_use]
    pub fn quantity(&self, id: &ProductId) -> Option<u32> {
        self.items.get(id).copied()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copy of the current entries, detached from the ledger.
    #[must_use]
    pub fn snapshot(&self) -> CartItems {
        self.items.clone()
    }

    /// Add `quantity` units of a product. The product is not checked against
    /// the catalog. Adding zero units changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted; the cart is
    /// unchanged in that case.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn add(&mut self, id: &ProductId, quantity: u32) -> Result<(), StorageError> {
        if quantity == 0 {
            return Ok(());
        }
        let mut next = self.items.clone();
        let entry = next.entry(id.clone()).or_insert(0);
        *entry = entry.saturating_add(quantity);
        tracing::debug!(quantity = *entry, "Cart entry increased");
        self.commit(next)
    }

    /// Adjust a product's quantity by `delta`. Absent products are ignored;
    /// an entry that reaches zero or below is removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted; the cart is
    /// unchanged in that case.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn change_quantity(&mut self, id: &ProductId, delta: i64) -> Result<(), StorageError> {
        let Some(&current) = self.items.get(id) else {
            return Ok(());
        };

        let mut next = self.items.clone();
        let updated = i64::from(current).saturating_add(delta);
        if updated <= 0 {
            next.shift_remove(id);
            tracing::debug!("Cart entry removed");
        } else {
            let quantity = u32::try_from(updated).unwrap_or(u32::MAX);
            next.insert(id.clone(), quantity);
            tracing::debug!(quantity, "Cart entry adjusted");
        }
        self.commit(next)
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted; the cart is
    /// unchanged in that case.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove(&mut self, id: &ProductId) -> Result<(), StorageError> {
        let mut next = self.items.clone();
        next.shift_remove(id);
        self.commit(next)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted; the cart is
    /// unchanged in that case.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.commit(CartItems::new())
    }

    /// Replace the cart with `items`, e.g. to undo a clear.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted; the cart is
    /// unchanged in that case.
    #[instrument(skip_all, fields(items = items.len()))]
    pub fn restore(&mut self, items: CartItems) -> Result<(), StorageError> {
        self.commit(items)
    }

    /// Total price of entries that resolve in `catalog`.
    #[must_use]
    pub fn total(&self, catalog: &[Product]) -> Decimal {
        cart_total(&self.items, catalog)
    }

    /// Sum of all quantities, for the cart badge.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items
            .values()
            .fold(0, |count, &qty| count.saturating_add(u64::from(qty)))
    }

    fn commit(&mut self, next: CartItems) -> Result<(), StorageError> {
        self.store.save(&self.key, &next)?;
        self.items = next;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use devshop_core::Price;
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::default_products;

    const KEY: &str = "devshop_cart_v1";

    fn p(id: &str) -> ProductId {
        ProductId::new(id)
    }

    fn empty() -> (PersistentStore, CartLedger) {
        let store = PersistentStore::in_memory();
        let cart = CartLedger::load(store.clone(), KEY);
        (store, cart)
    }

    #[test]
    fn test_add_initializes_and_increments() {
        let (store, mut cart) = empty();
        cart.add(&p("p1"), 1).unwrap();
        cart.add(&p("p1"), 2).unwrap();
        cart.add(&p("p2"), 1).unwrap();

        assert_eq!(cart.quantity(&p("p1")), Some(3));
        assert_eq!(cart.count(), 4);
        assert_eq!(store.load::<CartItems>(KEY), Some(cart.snapshot()));
    }

    #[test]
    fn test_add_zero_is_noop() {
        let (store, mut cart) = empty();
        cart.add(&p("p1"), 0).unwrap();
        assert!(cart.is_empty());
        assert_eq!(store.load::<CartItems>(KEY), None);
    }

    #[test]
    fn test_change_quantity_absent_is_noop() {
        let (_, mut cart) = empty();
        cart.change_quantity(&p("p1"), 5).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_to_zero_removes() {
        let (store, mut cart) = empty();
        cart.add(&p("p1"), 1).unwrap();
        cart.change_quantity(&p("p1"), -1).unwrap();
        assert_eq!(cart.quantity(&p("p1")), None);
        assert!(store.load::<CartItems>(KEY).unwrap().is_empty());
    }

    #[test]
    fn test_change_quantity_below_zero_removes() {
        let (_, mut cart) = empty();
        cart.add(&p("p1"), 2).unwrap();
        cart.change_quantity(&p("p1"), -10).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_keeps_position() {
        let (_, mut cart) = empty();
        cart.add(&p("p1"), 1).unwrap();
        cart.add(&p("p2"), 1).unwrap();
        cart.change_quantity(&p("p1"), 1).unwrap();
        let ids: Vec<&str> = cart.items().keys().map(ProductId::as_str).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let (_, mut cart) = empty();
        cart.add(&p("p1"), 1).unwrap();
        cart.add(&p("p2"), 1).unwrap();
        cart.remove(&p("p1")).unwrap();
        cart.remove(&p("missing")).unwrap();
        assert_eq!(cart.count(), 1);
        cart.clear().unwrap();
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_restore_after_clear() {
        let (store, mut cart) = empty();
        cart.add(&p("p1"), 2).unwrap();
        let saved = cart.snapshot();
        cart.clear().unwrap();

        cart.restore(saved.clone()).unwrap();
        assert_eq!(cart.items(), &saved);
        assert_eq!(store.load::<CartItems>(KEY), Some(saved));
    }

    #[test]
    fn test_total_against_catalog() {
        let (_, mut cart) = empty();
        cart.add(&p("p1"), 2).unwrap();
        cart.add(&p("p2"), 1).unwrap();
        assert_eq!(cart.total(&default_products()), Decimal::new(8997, 0));
    }

    #[test]
    fn test_total_skips_dangling_entries() {
        let (_, mut cart) = empty();
        cart.add(&p("p4"), 1).unwrap();
        cart.add(&p("deleted"), 7).unwrap();
        assert_eq!(cart.total(&default_products()), Decimal::new(899, 0));
        assert_eq!(cart.total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_total_at_max_price_and_quantity() {
        let (_, mut cart) = empty();
        let mut catalog = Vec::new();
        for n in 0..8 {
            let mut product = default_products().remove(0);
            product.id = p(&format!("big{n}"));
            product.price = Price::MAX;
            cart.add(&product.id, u32::MAX).unwrap();
            catalog.push(product);
        }
        let expected = Price::MAX.line_total(u32::MAX) * Decimal::from(8);
        assert_eq!(cart.total(&catalog), expected);
        assert_eq!(cart.count(), u64::from(u32::MAX) * 8);
    }

    #[test]
    fn test_load_restores_previous_cart() {
        let (store, mut cart) = empty();
        cart.add(&p("p3"), 2).unwrap();
        let reloaded = CartLedger::load(store, KEY);
        assert_eq!(reloaded.items(), cart.items());
    }

    #[test]
    fn test_corrupt_cart_starts_empty() {
        let store = PersistentStore::in_memory();
        store.backend().set_item(KEY, r#"{"p1":-2}"#).unwrap();
        assert!(CartLedger::load(store.clone(), KEY).is_empty());

        store.backend().set_item(KEY, r#"{"p1":0}"#).unwrap();
        assert!(CartLedger::load(store, KEY).is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, u32),
        Change(u8, i64),
        Remove(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4, 0u32..5).prop_map(|(id, qty)| Op::Add(id, qty)),
            (0u8..4, -6i64..6).prop_map(|(id, delta)| Op::Change(id, delta)),
            (0u8..4).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_quantities_stay_positive(ops in proptest::collection::vec(op(), 0..40)) {
            let (store, mut cart) = empty();
            for op in ops {
                match op {
                    Op::Add(id, qty) => cart.add(&p(&format!("p{id}")), qty).unwrap(),
                    Op::Change(id, delta) => cart.change_quantity(&p(&format!("p{id}")), delta).unwrap(),
                    Op::Remove(id) => cart.remove(&p(&format!("p{id}"))).unwrap(),
                }
                prop_assert!(cart.items().values().all(|&qty| qty >= 1));
            }
            let persisted = store.load::<CartItems>(KEY).unwrap_or_default();
            prop_assert_eq!(&persisted, cart.items());
        }
    }
}
