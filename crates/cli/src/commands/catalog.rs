//! Catalog commands.

use std::io::Write;

use clap::Subcommand;
use devshop_core::ProductId;
use devshop_storefront::models::{Product, ProductInput};
use devshop_storefront::views::{SortKey, category_label};
use devshop_storefront::{AppError, Storefront};

use super::CommandError;

#[derive(Subcommand)]
pub enum ProductAction {
    /// List products, optionally filtered and sorted
    List {
        /// Category to show (`all` for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Text to search for in name, description and category
        #[arg(short, long, default_value = "")]
        search: String,

        /// `price-asc`, `price-desc`, `name-asc` or `name-desc`
        #[arg(long)]
        sort: Option<String>,
    },
    /// List the category filter values
    Categories,
    /// Show a single product
    Show {
        /// Product id
        id: String,
    },
    /// Create a product, or edit the one named by --id
    Upsert {
        /// Id of the product to edit
        #[arg(long)]
        id: Option<String>,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Price (unparsable input is stored as 0)
        #[arg(short, long, default_value = "")]
        price: String,

        /// Category (defaults to General)
        #[arg(short, long, default_value = "")]
        category: String,

        /// Image reference (defaults to the category image)
        #[arg(long, default_value = "")]
        image: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },
}

/// Run a catalog command.
///
/// # Errors
///
/// Returns an error if the catalog cannot be persisted or output fails.
pub fn run(
    shop: &mut Storefront,
    action: ProductAction,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match action {
        ProductAction::List {
            category,
            search,
            sort,
        } => {
            let sort = sort.as_deref().and_then(SortKey::parse);
            let list = shop.filter_and_sort(category.as_deref(), &search, sort);
            if list.is_empty() {
                writeln!(out, "No products match.")?;
            }
            for product in list {
                write_product_row(shop, product, out)?;
            }
        }
        ProductAction::Categories => {
            for category in shop.categories() {
                writeln!(out, "{category}\t{}", category_label(&category))?;
            }
        }
        ProductAction::Show { id } => {
            let product = shop
                .product(&ProductId::new(id.as_str()))
                .ok_or(AppError::NotFound(id))?;
            write_product_row(shop, product, out)?;
            writeln!(out, "  category: {}", product.category)?;
            writeln!(out, "  image:    {}", product.image)?;
            if !product.description.is_empty() {
                writeln!(out, "  {}", product.description)?;
            }
        }
        ProductAction::Upsert {
            id,
            name,
            price,
            category,
            image,
            description,
        } => {
            let input = ProductInput {
                id: id.map(ProductId::new),
                name,
                price,
                category,
                image,
                description,
            };
            let product = shop.upsert_product(&input)?;
            writeln!(out, "Saved {}", product.id)?;
            write_product_row(shop, &product, out)?;
        }
    }
    Ok(())
}

fn write_product_row(
    shop: &Storefront,
    product: &Product,
    out: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}",
        product.id,
        product.name,
        product.price.display(shop.currency())
    )
}
