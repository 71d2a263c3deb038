//! Read-only projections of catalog and cart state for display.
//!
//! Nothing here touches storage. Every function borrows its inputs and
//! returns a fresh view.

use std::str::FromStr;

use devshop_core::Price;
use rust_decimal::Decimal;

use crate::catalog::ALL_CATEGORIES;
use crate::models::{CartItems, Product};

/// Product list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    /// Parse a sort selector value. Unrecognized values yield `None`, which
    /// keeps catalog order.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "price-asc" => Some(Self::PriceAsc),
            "price-desc" => Some(Self::PriceDesc),
            "name-asc" => Some(Self::NameAsc),
            "name-desc" => Some(Self::NameDesc),
            _ => None,
        }
    }

    /// Selector value for this ordering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown sort key: {s}"))
    }
}

/// Display label for a category filter value.
#[must_use]
pub fn category_label(category: &str) -> &str {
    if category == ALL_CATEGORIES {
        "All"
    } else {
        category
    }
}

/// Filter and order products for the product grid.
///
/// 1. `category` other than `None` or [`ALL_CATEGORIES`] keeps exact matches.
/// 2. A non-blank `search` keeps products whose name, description or
///    category contains it, ignoring case.
/// 3. `sort` orders the result; `None` keeps catalog order. Sorts are stable
///    and names compare byte-wise.
///
/// An empty result means "nothing to show", whether the catalog is empty or
/// nothing matched.
#[must_use]
pub fn filter_and_sort<'a>(
    catalog: &'a [Product],
    category: Option<&str>,
    search: &str,
    sort: Option<SortKey>,
) -> Vec<&'a Product> {
    let category = category.filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);
    let needle = search.trim().to_lowercase();

    let mut list: Vec<&Product> = catalog
        .iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .filter(|p| needle.is_empty() || p.search_text().contains(&needle))
        .collect();

    match sort {
        Some(SortKey::PriceAsc) => list.sort_by(|a, b| a.price.cmp(&b.price)),
        Some(SortKey::PriceDesc) => list.sort_by(|a, b| b.price.cmp(&a.price)),
        Some(SortKey::NameAsc) => list.sort_by(|a, b| a.name.cmp(&b.name)),
        Some(SortKey::NameDesc) => list.sort_by(|a, b| b.name.cmp(&a.name)),
        None => {}
    }

    list
}

/// One resolved cart entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Resolved cart contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView<'a> {
    pub lines: Vec<CartLine<'a>>,
    pub subtotal: Decimal,
}

impl CartView<'_> {
    /// Whether there is nothing to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities over the displayed lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .fold(0, |count, l| count.saturating_add(u64::from(l.quantity)))
    }
}

/// Resolve cart entries against the catalog, in cart order.
///
/// Entries whose product is missing are left out, matching the cart total.
#[must_use]
pub fn cart_view<'a>(cart: &CartItems, catalog: &'a [Product]) -> CartView<'a> {
    let lines: Vec<CartLine<'a>> = cart
        .iter()
        .filter_map(|(id, &quantity)| {
            catalog.iter().find(|p| &p.id == id).map(|product| CartLine {
                product,
                quantity,
                line_total: product.price.line_total(quantity),
            })
        })
        .collect();
    let subtotal = lines
        .iter()
        .fold(Decimal::ZERO, |sum, l| sum.saturating_add(l.line_total));

    CartView { lines, subtotal }
}

/// Checkout summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary<'a> {
    pub lines: Vec<CartLine<'a>>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
}

/// Cart view plus a fixed shipping fee.
#[must_use]
pub fn order_summary<'a>(
    cart: &CartItems,
    catalog: &'a [Product],
    shipping_fee: Price,
) -> OrderSummary<'a> {
    let CartView { lines, subtotal } = cart_view(cart, catalog);
    let shipping_fee = shipping_fee.amount();

    OrderSummary {
        lines,
        subtotal,
        shipping_fee,
        total: subtotal.saturating_add(shipping_fee),
    }
}
