//! Cart commands.

use std::io::Write;

use clap::Subcommand;
use devshop_core::ProductId;
use devshop_storefront::Storefront;

use super::CommandError;

const EMPTY_CART: &str = "Your cart is empty. Add something awesome!";

#[derive(Subcommand)]
pub enum CartAction {
    /// Show cart lines and subtotal
    Show,
    /// Add units of a product
    Add {
        /// Product id
        id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Change a product's quantity by a signed amount
    Qty {
        /// Product id
        id: String,

        /// Units to add (positive) or take away (negative)
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Empty the cart
    Clear,
}

/// Run a cart command.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted or output fails.
pub fn run(
    shop: &mut Storefront,
    action: CartAction,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match action {
        CartAction::Show => return show(shop, out),
        CartAction::Add { id, quantity } => {
            shop.add_to_cart(&ProductId::new(id), quantity)?;
        }
        CartAction::Remove { id } => shop.remove_from_cart(&ProductId::new(id))?,
        CartAction::Qty { id, delta } => shop.change_quantity(&ProductId::new(id), delta)?,
        CartAction::Clear => shop.clear_cart()?,
    }

    writeln!(out, "Cart: {} item(s)", shop.cart_count())?;
    Ok(())
}

fn show(shop: &Storefront, out: &mut impl Write) -> Result<(), CommandError> {
    let view = shop.cart_view();
    if view.is_empty() {
        writeln!(out, "{EMPTY_CART}")?;
        return Ok(());
    }

    for line in &view.lines {
        writeln!(
            out,
            "{}\t{}\t{} x {}\t{}",
            line.product.id,
            line.product.name,
            line.quantity,
            line.product.price.display(shop.currency()),
            shop.format_amount(line.line_total)
        )?;
    }
    writeln!(out, "Subtotal: {}", shop.format_amount(view.subtotal))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use devshop_storefront::config::StorefrontConfig;
    use devshop_storefront::storage::PersistentStore;

    use super::*;

    fn shop() -> Storefront {
        Storefront::with_store(PersistentStore::in_memory(), &StorefrontConfig::default()).unwrap()
    }

    fn output(shop: &mut Storefront, action: CartAction) -> String {
        let mut out = Vec::new();
        run(shop, action, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_cart_message() {
        let mut shop = shop();
        assert_eq!(output(&mut shop, CartAction::Show).trim(), EMPTY_CART);
    }

    #[test]
    fn test_add_reports_badge_count() {
        let mut shop = shop();
        let text = output(
            &mut shop,
            CartAction::Add {
                id: "p1".to_string(),
                quantity: 2,
            },
        );
        assert_eq!(text.trim(), "Cart: 2 item(s)");
    }

    #[test]
    fn test_show_lines_and_subtotal() {
        let mut shop = shop();
        output(
            &mut shop,
            CartAction::Add {
                id: "p1".to_string(),
                quantity: 2,
            },
        );
        output(
            &mut shop,
            CartAction::Add {
                id: "p2".to_string(),
                quantity: 1,
            },
        );

        let text = output(&mut shop, CartAction::Show);
        assert!(text.contains("p1\tUrban Runner Sneakers\t2 x ₹2499.00\t₹4998.00"));
        assert!(text.ends_with("Subtotal: ₹8997.00\n"));
    }

    #[test]
    fn test_qty_to_zero_removes_line() {
        let mut shop = shop();
        output(
            &mut shop,
            CartAction::Add {
                id: "p3".to_string(),
                quantity: 1,
            },
        );
        let text = output(
            &mut shop,
            CartAction::Qty {
                id: "p3".to_string(),
                delta: -1,
            },
        );
        assert_eq!(text.trim(), "Cart: 0 item(s)");
        assert!(shop.cart_items().is_empty());
    }
}
