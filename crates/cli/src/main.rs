//! DevShop CLI - terminal host for the storefront engine.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! devshop products list --category Shoes --sort price-asc
//! devshop products list --search headphones
//!
//! # Add a product (or edit one with --id)
//! devshop products upsert -n "Trail Boots" -p 3499 -c Shoes
//!
//! # Work with the cart
//! devshop cart add p1 -q 2
//! devshop cart qty p1 -1
//! devshop cart show
//!
//! # Check out
//! devshop checkout summary
//! devshop checkout place --name "A" --email a@x.com --address "1 Main St"
//! devshop orders list
//! ```
//!
//! State lives in `--storage-dir`, `DEVSHOP_STORAGE_DIR`, or `.devshop` in
//! the working directory, in that order.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use devshop_storefront::Storefront;
use devshop_storefront::config::StorefrontConfig;
use devshop_storefront::telemetry;

mod commands;

use commands::CommandError;
use commands::cart::CartAction;
use commands::catalog::ProductAction;
use commands::orders::{CheckoutAction, OrderAction};

const DEFAULT_STORAGE_DIR: &str = ".devshop";

#[derive(Parser)]
#[command(name = "devshop")]
#[command(author, version, about = "DevShop storefront tools")]
struct Cli {
    /// Directory holding the storefront records
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and edit the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Review and place an order
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
    /// Inspect placed orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = telemetry::init_tracing(telemetry::LogFormat::default());
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _ = telemetry::init_tracing(config.log_format);

    config.storage_dir = cli
        .storage_dir
        .or(config.storage_dir)
        .or_else(|| Some(PathBuf::from(DEFAULT_STORAGE_DIR)));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match run(cli.command, &config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::App(e)) if e.is_user_facing() => {
            e.log();
            let _ = writeln!(out, "{}", e.user_message());
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    command: Commands,
    config: &StorefrontConfig,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut shop = Storefront::open(config)?;

    match command {
        Commands::Products { action } => commands::catalog::run(&mut shop, action, out),
        Commands::Cart { action } => commands::cart::run(&mut shop, action, out),
        Commands::Checkout { action } => commands::orders::checkout(&mut shop, action, out),
        Commands::Orders { action } => commands::orders::list(&shop, action, out),
    }
}
