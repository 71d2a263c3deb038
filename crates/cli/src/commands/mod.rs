//! Subcommand implementations.
//!
//! Each command writes human-readable output to the given writer and leaves
//! every rule to the storefront engine.

pub mod cart;
pub mod catalog;
pub mod orders;

use devshop_storefront::AppError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The storefront rejected or failed the operation.
    #[error(transparent)]
    App(#[from] AppError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
