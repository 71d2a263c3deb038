//! Unified error handling.
//!
//! Provides a unified `AppError` type for every storefront operation that can
//! fail. Stored-data corruption has no variant here: it is recovered inside
//! the repositories and only ever logged.

use thiserror::Error;

use crate::config::ConfigError;
use crate::models::CustomerField;
use crate::storage::StorageError;

/// A rejected user action. Nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required checkout fields are blank.
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<CustomerField>),

    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,
}

fn join_fields(fields: &[CustomerField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persisting a record failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// User input was rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found. The engine never raises this itself; hosts use it
    /// for lookups by id, such as showing a single product.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether the error should be shown to the user as-is.
    ///
    /// Validation failures and host-raised `NotFound` are user-facing.
    /// Storage and configuration faults are internal; the user gets a generic
    /// message and the details go to the log.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }

    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::MissingFields(_)) => {
                "Fill all details".to_string()
            }
            Self::Validation(ValidationError::EmptyCart) => {
                "Your cart is empty. Add items to checkout.".to_string()
            }
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Storage(_) | Self::Config(_) => "Something went wrong".to_string(),
        }
    }

    /// Log internal errors. User-facing rejections are logged at debug only.
    pub fn log(&self) {
        if self.is_user_facing() {
            tracing::debug!(error = %self, "Request rejected");
        } else {
            tracing::error!(error = %self, "Storefront error");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
