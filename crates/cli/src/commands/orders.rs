//! Checkout and order history commands.

use std::io::Write;

use clap::Subcommand;
use devshop_storefront::models::CustomerInfo;
use devshop_storefront::{AppError, Storefront, ValidationError};

use super::CommandError;

#[derive(Subcommand)]
pub enum CheckoutAction {
    /// Show the order summary for the current cart
    Summary,
    /// Place an order for the current cart
    Place {
        /// Customer name
        #[arg(long, default_value = "")]
        name: String,

        /// Customer email
        #[arg(long, default_value = "")]
        email: String,

        /// Shipping address
        #[arg(long, default_value = "")]
        address: String,
    },
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// List placed orders, oldest first
    List,
}

/// Run a checkout command.
///
/// # Errors
///
/// Returns a validation error for an empty cart or blank customer fields,
/// and a storage error if the order cannot be persisted.
pub fn checkout(
    shop: &mut Storefront,
    action: CheckoutAction,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match action {
        CheckoutAction::Summary => {
            let summary = shop.order_summary();
            if summary.lines.is_empty() {
                return Err(AppError::from(ValidationError::EmptyCart).into());
            }
            for line in &summary.lines {
                writeln!(
                    out,
                    "{} x {}\t{}",
                    line.product.name,
                    line.quantity,
                    shop.format_amount(line.line_total)
                )?;
            }
            writeln!(out, "Subtotal: {}", shop.format_amount(summary.subtotal))?;
            writeln!(out, "Shipping: {}", shop.format_amount(summary.shipping_fee))?;
            writeln!(out, "Total:    {}", shop.format_amount(summary.total))?;
        }
        CheckoutAction::Place {
            name,
            email,
            address,
        } => {
            let order = shop.place_order(&CustomerInfo {
                name,
                email,
                address,
            })?;
            writeln!(out, "Order placed! Order ID: {}", order.id)?;
        }
    }
    Ok(())
}

/// Run an order history command.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn list(
    shop: &Storefront,
    action: OrderAction,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match action {
        OrderAction::List => {
            if shop.orders().is_empty() {
                writeln!(out, "No orders yet.")?;
            }
            for order in shop.orders() {
                writeln!(
                    out,
                    "{}\t{}\t{} item(s)\t{}\t{}",
                    order.id,
                    order.date.format("%Y-%m-%d %H:%M"),
                    order.item_count(),
                    shop.format_amount(order.total),
                    order.customer.name
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use devshop_core::ProductId;
    use devshop_storefront::config::StorefrontConfig;
    use devshop_storefront::storage::PersistentStore;

    use super::*;

    fn shop_with(id: &str) -> Storefront {
        let mut shop =
            Storefront::with_store(PersistentStore::in_memory(), &StorefrontConfig::default())
                .unwrap();
        shop.add_to_cart(&ProductId::new(id), 1).unwrap();
        shop
    }

    fn place(name: &str) -> CheckoutAction {
        CheckoutAction::Place {
            name: name.to_string(),
            email: "a@x.com".to_string(),
            address: "addr".to_string(),
        }
    }

    #[test]
    fn test_summary_totals() {
        let mut shop = shop_with("p4");
        let mut out = Vec::new();
        checkout(&mut shop, CheckoutAction::Summary, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Subtotal: ₹899.00"));
        assert!(text.contains("Total:    ₹899.00"));
    }

    #[test]
    fn test_summary_rejects_empty_cart() {
        let mut shop =
            Storefront::with_store(PersistentStore::in_memory(), &StorefrontConfig::default())
                .unwrap();
        let err = checkout(&mut shop, CheckoutAction::Summary, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            CommandError::App(AppError::Validation(ValidationError::EmptyCart))
        ));
    }

    #[test]
    fn test_place_then_list() {
        let mut shop = shop_with("p1");
        let mut out = Vec::new();
        checkout(&mut shop, place("A"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Order placed! Order ID: o"));
        assert_eq!(shop.cart_count(), 0);

        let mut out = Vec::new();
        list(&shop, OrderAction::List, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1 item(s)\t₹2499.00\tA"));
    }

    #[test]
    fn test_place_with_blank_name_keeps_cart() {
        let mut shop = shop_with("p1");
        let err = checkout(&mut shop, place(" "), &mut Vec::new()).unwrap_err();
        let CommandError::App(err) = err else {
            panic!("expected app error");
        };
        assert_eq!(err.user_message(), "Fill all details");
        assert_eq!(shop.cart_count(), 1);
    }

    #[test]
    fn test_empty_history() {
        let shop = Storefront::with_store(PersistentStore::in_memory(), &StorefrontConfig::default())
            .unwrap();
        let mut out = Vec::new();
        list(&shop, OrderAction::List, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "No orders yet.");
    }
}
