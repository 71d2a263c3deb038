//! Order domain types.

use std::fmt;

use chrono::{DateTime, Utc};
use devshop_core::{OrderId, ProductId};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Cart contents: product id to quantity, in insertion order.
pub type CartItems = IndexMap<ProductId, u32>;

/// Customer details as entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// A required checkout field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    Name,
    Email,
    Address,
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
            Self::Address => write!(f, "address"),
        }
    }
}

/// Validated customer details: every field trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub address: String,
}

impl TryFrom<&CustomerInfo> for Customer {
    type Error = ValidationError;

    fn try_from(info: &CustomerInfo) -> Result<Self, Self::Error> {
        let name = info.name.trim();
        let email = info.email.trim();
        let address = info.address.trim();

        let missing: Vec<CustomerField> = [
            (CustomerField::Name, name),
            (CustomerField::Email, email),
            (CustomerField::Address, address),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            address: address.to_string(),
        })
    }
}

/// A placed order. Immutable once appended to the order log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Placement time (ISO-8601 on the wire).
    pub date: DateTime<Utc>,
    /// Snapshot of the cart at placement time.
    pub items: CartItems,
    /// Cart total at placement time, against the catalog of that moment.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub customer: Customer,
}

impl Order {
    /// Total number of units in the order.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .values()
            .fold(0, |count, &qty| count.saturating_add(u64::from(qty)))
    }
}
