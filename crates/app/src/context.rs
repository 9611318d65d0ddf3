//! App Context

use std::{fmt, sync::Arc};

use pitstop::{
    fixtures::{Catalog, FixtureError},
    pricing::PricingRules,
};
use thiserror::Error;
use tracing::info;

use crate::{
    config::{ConfigError, ShopConfig},
    domain::{
        carts::{CartsService, DefaultCartsService, InMemoryCartsRepository},
        catalog::FixtureCatalogService,
        coupons::{
            FixtureCouponValidator,
            fixture::{CouponFixtureError, load_coupons},
        },
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load catalog fixture: {0}")]
    Catalog(#[source] FixtureError),

    #[error("failed to load coupon fixture: {0}")]
    Coupons(#[from] CouponFixtureError),

    #[error("catalog is priced in {catalog}, but carts use {configured}")]
    CurrencyMismatch {
        catalog: &'static str,
        configured: &'static str,
    },
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub rules: PricingRules,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from configuration and fixture files.
    ///
    /// # Errors
    ///
    /// Returns an error when configuration is invalid or a fixture cannot be loaded.
    pub fn from_config(config: &ShopConfig) -> Result<Self, AppInitError> {
        let rules = config.pricing.pricing_rules()?;
        let settings = config.collaborators.cart_settings()?;

        let fixtures_path = config.fixtures.fixtures_path.as_path();

        let catalog =
            Catalog::load(fixtures_path, &config.fixtures.catalog).map_err(AppInitError::Catalog)?;

        if let Some(currency) = catalog.currency().filter(|currency| *currency != rules.currency())
        {
            return Err(AppInitError::CurrencyMismatch {
                catalog: currency.iso_alpha_code,
                configured: rules.currency().iso_alpha_code,
            });
        }

        let coupons = load_coupons(fixtures_path, &config.fixtures.coupons)?;

        info!(
            products = catalog.len(),
            coupons = coupons.len(),
            "loaded fixtures"
        );

        let carts = DefaultCartsService::new(
            Arc::new(InMemoryCartsRepository::new()),
            Arc::new(FixtureCatalogService::new(catalog)),
            Arc::new(FixtureCouponValidator::new(coupons)),
            rules,
            settings,
        );

        Ok(Self {
            carts: Arc::new(carts),
            rules,
        })
    }
}
