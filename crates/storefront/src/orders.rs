//! Append-only order log.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use devshop_core::OrderId;
use tracing::instrument;

use crate::cart::cart_total;
use crate::error::{AppError, ValidationError};
use crate::models::{CartItems, Customer, CustomerInfo, Order, Product};
use crate::storage::{Loaded, PersistentStore, StorageError, StoredRecord};

impl StoredRecord for Vec<Order> {
    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.len());
        for order in self {
            if order.id.is_blank() {
                return Err("order with blank id".to_string());
            }
            if !seen.insert(order.id.as_str()) {
                return Err(format!("duplicate order id {}", order.id));
            }
        }
        Ok(())
    }
}

/// The log of placed orders, oldest first.
#[derive(Debug)]
pub struct OrderLog {
    store: PersistentStore,
    key: String,
    orders: Vec<Order>,
}

impl OrderLog {
    /// Load the order log. A missing or unreadable log starts empty; an
    /// unreadable one is only overwritten by the next successful append.
    #[instrument(skip(store))]
    pub fn load(store: PersistentStore, key: &str) -> Self {
        let orders = match store.inspect::<Vec<Order>>(key) {
            Loaded::Found(orders) => orders,
            Loaded::NotFound => Vec::new(),
            Loaded::Corrupt(reason) => {
                tracing::warn!(%reason, "Invalid order log in storage, starting empty");
                Vec::new()
            }
        };

        Self {
            store,
            key: key.to_string(),
            orders,
        }
    }

    /// All orders in append order.
    #[must_use]
    pub fn list(&self) -> &[Order] {
        &self.orders
    }

    /// Number of orders placed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no order has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Look up an order by id.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// Validate the customer, build an order from a copy of `items`, and
    /// persist it at the end of the log.
    ///
    /// The total is computed against `catalog`; entries missing from it are
    /// kept in the item snapshot but contribute nothing to the total.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a customer field is blank or `items`
    /// is empty, and `AppError::Storage` if the log cannot be persisted. In
    /// both cases nothing is appended.
    #[instrument(skip_all, fields(items = items.len()))]
    pub fn append(
        &mut self,
        customer: &CustomerInfo,
        items: &CartItems,
        catalog: &[Product],
    ) -> Result<Order, AppError> {
        let order = self.prepare(customer, items, catalog)?;
        self.record(order.clone())?;
        Ok(order)
    }

    /// Validate and build the next order without persisting it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a customer field is blank or `items`
    /// is empty.
    pub fn prepare(
        &self,
        customer: &CustomerInfo,
        items: &CartItems,
        catalog: &[Product],
    ) -> Result<Order, AppError> {
        self.prepare_at(customer, items, catalog, Utc::now())
    }

    pub(crate) fn prepare_at(
        &self,
        customer: &CustomerInfo,
        items: &CartItems,
        catalog: &[Product],
        placed_at: DateTime<Utc>,
    ) -> Result<Order, AppError> {
        let customer = Customer::try_from(customer)?;
        if items.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }

        Ok(Order {
            id: self.next_id(placed_at),
            date: placed_at,
            items: items.clone(),
            total: cart_total(items, catalog),
            customer,
        })
    }

    /// Persist a prepared order at the end of the log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be persisted; the log is
    /// unchanged in that case.
    pub fn record(&mut self, order: Order) -> Result<(), StorageError> {
        let mut next = self.orders.clone();
        let (id, total) = (order.id.clone(), order.total);
        next.push(order);
        self.store.save(&self.key, &next)?;
        self.orders = next;

        tracing::info!(order_id = %id, %total, "Order placed");
        Ok(())
    }

    fn next_id(&self, placed_at: DateTime<Utc>) -> OrderId {
        let sequence = self.orders.len() + 1;
        let id = OrderId::from_placement(placed_at, sequence);
        if self.get(&id).is_none() {
            return id;
        }
        loop {
            let id = OrderId::from_placement_salted(placed_at, sequence);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
