//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `DEVSHOP_STORAGE_DIR` - Directory for file-backed storage (default: in-memory)
//! - `DEVSHOP_KEY_PREFIX` - Prefix for the persisted record keys (default: devshop)
//! - `DEVSHOP_SHIPPING_FEE` - Fixed shipping fee added at checkout (default: 0)
//! - `DEVSHOP_CURRENCY` - Display currency code (default: INR)
//! - `DEVSHOP_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use std::path::PathBuf;
use std::str::FromStr;

use devshop_core::{CurrencyCode, Price};
use thiserror::Error;

use crate::telemetry::LogFormat;

const DEFAULT_KEY_PREFIX: &str = "devshop";
const KEY_VERSION: &str = "v1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory for file-backed storage; `None` keeps everything in memory
    pub storage_dir: Option<PathBuf>,
    /// Keys of the three persisted records
    pub keys: StorageKeys,
    /// Fixed shipping fee applied to the order summary
    pub shipping_fee: Price,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// Log output format
    pub log_format: LogFormat,
}

/// Keys under which catalog, cart and orders are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub products: String,
    pub cart: String,
    pub orders: String,
}

impl StorageKeys {
    /// Build the versioned key set for a prefix, e.g. `devshop_cart_v1`.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            products: format!("{prefix}_products_{KEY_VERSION}"),
            cart: format!("{prefix}_cart_{KEY_VERSION}"),
            orders: format!("{prefix}_orders_{KEY_VERSION}"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            keys: StorageKeys::default(),
            shipping_fee: Price::ZERO,
            currency: CurrencyCode::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_dir = get_optional_env("DEVSHOP_STORAGE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);
        let keys = StorageKeys::with_prefix(&get_env_or_default(
            "DEVSHOP_KEY_PREFIX",
            DEFAULT_KEY_PREFIX,
        ));
        let shipping_fee = parse_env("DEVSHOP_SHIPPING_FEE", "0")?;
        let currency = parse_env("DEVSHOP_CURRENCY", CurrencyCode::default().code())?;
        let log_format = parse_env("DEVSHOP_LOG_FORMAT", "pretty")?;

        Ok(Self {
            storage_dir,
            keys,
            shipping_fee,
            currency,
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let keys = StorageKeys::default();
        assert_eq!(keys.products, "devshop_products_v1");
        assert_eq!(keys.cart, "devshop_cart_v1");
        assert_eq!(keys.orders, "devshop_orders_v1");
    }

    #[test]
    fn test_prefixed_keys() {
        let keys = StorageKeys::with_prefix("staging");
        assert_eq!(keys.cart, "staging_cart_v1");
    }

    #[test]
    fn test_parse_shipping_fee() {
        let fee: Price = parse_value("DEVSHOP_SHIPPING_FEE", "49.5").unwrap();
        assert_eq!(fee.to_string(), "49.50");
    }

    #[test]
    fn test_parse_negative_shipping_fee_fails() {
        let result = parse_value::<Price>("DEVSHOP_SHIPPING_FEE", "-1");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "DEVSHOP_SHIPPING_FEE"));
    }

    #[test]
    fn test_parse_currency_and_log_format() {
        let currency: CurrencyCode = parse_value("DEVSHOP_CURRENCY", "usd").unwrap();
        assert_eq!(currency, CurrencyCode::USD);
        let format: LogFormat = parse_value("DEVSHOP_LOG_FORMAT", "json").unwrap();
        assert_eq!(format, LogFormat::Json);
        assert!(parse_value::<LogFormat>("DEVSHOP_LOG_FORMAT", "xml").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert!(config.storage_dir.is_none());
        assert_eq!(config.shipping_fee, Price::ZERO);
        assert_eq!(config.currency, CurrencyCode::INR);
    }
}
