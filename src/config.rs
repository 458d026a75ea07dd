//! Store configuration
//!
//! Store-wide settings read once at startup: the catalog currency and the
//! checkout fees and rates. Every field is optional in the YAML document and
//! falls back to the defaults in [`CheckoutRules::default`].

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{
    checkout::CheckoutRules,
    fixtures::{FixtureError, find_currency, parse_percentage, parse_price},
};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// An amount or rate could not be parsed
    #[error(transparent)]
    Value(#[from] FixtureError),

    /// An amount is written in a different currency from the store
    #[error("Currency mismatch in {field}: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Config field
        field: &'static str,
        /// Store currency
        expected: &'static str,
        /// Currency the amount was written in
        found: &'static str,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StoreConfigFile {
    #[serde(default)]
    currency: Option<String>,

    #[serde(default)]
    checkout: CheckoutRulesFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CheckoutRulesFile {
    free_shipping_threshold: Option<String>,
    standard_fee: Option<String>,
    express_fee: Option<String>,
    tax_rate: Option<String>,
}

/// Store configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreConfig {
    /// Currency catalog prices and checkout amounts are written in
    pub currency: &'static Currency,

    /// Checkout fees and rates
    pub checkout: CheckoutRules,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: iso::USD,
            checkout: CheckoutRules::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any value is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_yaml(&contents)?;

        info!(
            path = %path.display(),
            currency = config.currency.iso_alpha_code,
            "loaded store config"
        );

        Ok(config)
    }

    /// Parse configuration from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or any value is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: StoreConfigFile = serde_norway::from_str(yaml)?;
        let defaults = CheckoutRules::default();

        let currency = match file.currency.as_deref() {
            None => iso::USD,
            Some(code) => {
                find_currency(code).ok_or_else(|| ConfigError::UnknownCurrency(code.to_string()))?
            }
        };

        let amount = |field: &'static str,
                      value: Option<&str>,
                      default: Decimal|
         -> Result<Decimal, ConfigError> {
            let Some(value) = value else {
                return Ok(default);
            };

            let (amount, found) = parse_price(value)?;

            if found == currency {
                Ok(amount)
            } else {
                Err(ConfigError::CurrencyMismatch {
                    field,
                    expected: currency.iso_alpha_code,
                    found: found.iso_alpha_code,
                })
            }
        };

        let checkout = CheckoutRules {
            free_shipping_threshold: amount(
                "free-shipping-threshold",
                file.checkout.free_shipping_threshold.as_deref(),
                defaults.free_shipping_threshold,
            )?,
            standard_fee: amount(
                "standard-fee",
                file.checkout.standard_fee.as_deref(),
                defaults.standard_fee,
            )?,
            express_fee: amount(
                "express-fee",
                file.checkout.express_fee.as_deref(),
                defaults.express_fee,
            )?,
            tax_rate: file
                .checkout
                .tax_rate
                .as_deref()
                .map(parse_percentage)
                .transpose()?
                .unwrap_or(defaults.tax_rate),
        };

        Ok(Self { currency, checkout })
    }
}
