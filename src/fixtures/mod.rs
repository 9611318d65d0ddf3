//! Fixtures
//!
//! YAML catalog data used by the in-memory collaborators and the CLI.

use std::{fs, path::PathBuf};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

use crate::{
    fixtures::catalog::CatalogFixture,
    products::{CatalogEntry, ProductId, ProductIdError},
};

pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid product identifier
    #[error("Invalid product id: {0}")]
    InvalidProductId(#[from] ProductIdError),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),
}

/// A loaded product catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: FxHashMap<ProductId, CatalogEntry>,
    currency: Option<&'static Currency>,
}

impl Catalog {
    /// Load `<base_path>/catalog/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if products
    /// use more than one currency.
    pub fn load(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let file_path = base_path
            .into()
            .join("catalog")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or products use more than one currency.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;
        let mut catalog = Self::default();

        for (key, product) in fixture.products {
            let entry = CatalogEntry::try_from(product)?;
            let currency = entry.unit_price.currency();

            match catalog.currency {
                Some(existing) if existing != currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => catalog.currency = Some(currency),
            }

            catalog.entries.insert(ProductId::new(key)?, entry);
        }

        Ok(catalog)
    }

    /// Look up a product.
    pub fn get(&self, product_id: &ProductId) -> Option<&CatalogEntry> {
        self.entries.get(product_id)
    }

    /// Currency shared by all products, if any were loaded.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no products were loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the catalog into its entries.
    pub fn into_entries(self) -> FxHashMap<ProductId, CatalogEntry> {
        self.entries
    }
}

/// Parse a currency code supported by the shop.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything but EUR, GBP or USD.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Convert a decimal amount (e.g. `5.99`) to minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the amount does not fit in minor units.
pub fn decimal_to_minor(amount: Decimal) -> Result<i64, FixtureError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(amount.to_string()))
}

/// Parse a price string (e.g. `"89.99 EUR"`) into money.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal or is negative, or if the currency code is
/// not recognized.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount < Decimal::ZERO {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let currency = parse_currency(code)?;

    Ok(Money::from_minor(decimal_to_minor(amount)?, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string is not a number, or is negative.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let fraction = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<Decimal>()
            .map(|value| value / Decimal::ONE_HUNDRED)
    } else {
        trimmed.parse::<Decimal>()
    }
    .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    if fraction.is_sign_negative() {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(fraction))
}
