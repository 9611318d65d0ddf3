//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use pitstop::{
    fixtures::Catalog,
    products::{CatalogEntry, ProductId},
};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::domain::catalog::errors::CatalogError;

/// Catalog backed by a loaded YAML fixture.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalogService {
    entries: FxHashMap<ProductId, CatalogEntry>,
}

impl FixtureCatalogService {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            entries: catalog.into_entries(),
        }
    }

    /// Build a catalog from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (ProductId, CatalogEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

#[async_trait]
impl CatalogService for FixtureCatalogService {
    async fn lookup(&self, product: &ProductId) -> Result<CatalogEntry, CatalogError> {
        debug!(product_id = %product, "catalog lookup");

        self.entries
            .get(product)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(product.clone()))
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Look up name, brand, price, image and stock state for a product.
    async fn lookup(&self, product: &ProductId) -> Result<CatalogEntry, CatalogError>;
}
