//! Catalog lookup errors.

use pitstop::products::ProductId;
use thiserror::Error;

/// Catalog lookup error variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog has no product with this id.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The catalog could not be reached or failed.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
