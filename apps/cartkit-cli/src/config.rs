//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! ## Environment Variables
//! - `CARTKIT_CURRENCY_SYMBOL`: prefix for printed amounts (default `$`)
//! - `CARTKIT_COUPONS`: path to a JSON coupon table (default: built-in table)
//! - `CARTKIT_LOG`: log filter directive, falls back to `RUST_LOG`, then `warn`

use std::fs;
use std::path::{Path, PathBuf};

use cartkit_core::{CouponTable, Money};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_CURRENCY_SYMBOL: &str = "$";
const DEFAULT_LOG_FILTER: &str = "warn";

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Printed before every amount (display only, no conversion)
    pub currency_symbol: String,

    /// JSON coupon table to load instead of the built-in one
    pub coupons_path: Option<PathBuf>,

    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            coupons_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CliConfig::default();

        let coupons_path = match var("CARTKIT_COUPONS") {
            Some(path) if path.trim().is_empty() => {
                return Err(ConfigError::InvalidValue("CARTKIT_COUPONS".to_string()))
            }
            Some(path) => Some(PathBuf::from(path)),
            None => None,
        };

        let log_filter = var("CARTKIT_LOG")
            .or_else(|| var("RUST_LOG"))
            .unwrap_or(defaults.log_filter);
        EnvFilter::try_new(&log_filter)
            .map_err(|_| ConfigError::InvalidValue("CARTKIT_LOG".to_string()))?;

        Ok(CliConfig {
            currency_symbol: var("CARTKIT_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            coupons_path,
            log_filter,
        })
    }

    /// Builds the coupon table: the configured file, or the built-in one.
    pub fn coupon_table(&self) -> Result<CouponTable, ConfigError> {
        match &self.coupons_path {
            Some(path) => load_coupon_file(path),
            None => Ok(CouponTable::default()),
        }
    }

    /// Formats an amount for display, e.g. `12.3` → `$12.30` with the
    /// default symbol.
    pub fn format_money(&self, amount: Money) -> String {
        format!("{}{}", self.currency_symbol, amount)
    }
}

fn load_coupon_file(path: &Path) -> Result<CouponTable, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::CouponFile {
        path: path.to_path_buf(),
        source,
    })?;

    let table: CouponTable =
        serde_json::from_str(&contents).map_err(|source| ConfigError::CouponFormat {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), codes = table.len(), "Loaded coupon table");
    Ok(table)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Cannot read coupon table {}: {source}", .path.display())]
    CouponFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Coupon table {} is not valid JSON: {source}", .path.display())]
    CouponFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}
