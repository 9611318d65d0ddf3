//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors raised while building product identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductIdError {
    /// The identifier was empty or only whitespace.
    #[error("product id cannot be empty")]
    Empty,
}

/// Opaque reference to an entry in the external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ProductIdError::Empty`] if nothing remains after trimming.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ProductIdError> {
        let trimmed = id.as_ref().trim();

        if trimmed.is_empty() {
            return Err(ProductIdError::Empty);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ProductId {
    type Error = ProductIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Catalog data for a product, as returned by a catalog lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Display name
    pub name: String,

    /// Manufacturer or brand
    pub brand: String,

    /// Gross unit price
    pub unit_price: Money<'static, Currency>,

    /// Image reference, if the catalog has one
    pub image: Option<String>,

    /// Whether the product can currently be ordered
    pub in_stock: bool,
}

impl CatalogEntry {
    /// Create an in-stock entry without an image.
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        unit_price: Money<'static, Currency>,
    ) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            unit_price,
            image: None,
            in_stock: true,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Mark the entry as out of stock.
    #[must_use]
    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }
}
