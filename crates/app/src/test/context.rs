//! Test context for service-level tests.

use std::sync::Arc;

use pitstop::{fixtures::Catalog, pricing::PricingRules};
use uuid::Uuid;

use crate::domain::{
    carts::{CartSettings, DefaultCartsService, InMemoryCartsRepository, models::CartOwner},
    catalog::{CatalogService, FixtureCatalogService},
    coupons::{CouponValidator, FixtureCouponValidator, fixture::coupons_from_yaml},
};

const CATALOG_YAML: &str = r"
products:
  P1:
    name: Bremsscheibe
    brand: ATE
    price: 89.99 EUR
  P2:
    name: Wischerblatt
    brand: Bosch
    price: 12.99 EUR
  oil-5w30:
    name: Motoröl 5W-30
    brand: Castrol
    price: 40.00 EUR
  spark-plug:
    name: Zündkerze
    brand: NGK
    price: 119.99 EUR
  sold-out:
    name: Ölfilter
    brand: MANN
    price: 9.99 EUR
    in_stock: false
";

const COUPONS_YAML: &str = r"
coupons:
  WINTER10:
    percent: 10%
    minimum_spend: 50.00 EUR
  FIVEOFF:
    amount: 5.00 EUR
  BIGSPENDER:
    amount: 500.00 EUR
  OLDNEWS:
    percent: 20%
    expires_at: 2020-01-01T00:00:00Z
";

pub(crate) struct TestContext {
    pub repository: Arc<InMemoryCartsRepository>,
    pub carts: DefaultCartsService,
    pub owner: CartOwner,
}

impl TestContext {
    /// Service over the in-memory repository and the test fixtures.
    pub fn new() -> Self {
        Self::with_collaborators(Arc::new(catalog()), Arc::new(coupons()))
    }

    /// Service over the in-memory repository with custom collaborators.
    pub fn with_collaborators(
        catalog: Arc<dyn CatalogService>,
        coupons: Arc<dyn CouponValidator>,
    ) -> Self {
        let repository = Arc::new(InMemoryCartsRepository::new());

        let carts = DefaultCartsService::new(
            repository.clone(),
            catalog,
            coupons,
            PricingRules::default(),
            CartSettings::default(),
        );

        Self {
            repository,
            carts,
            owner: CartOwner::Session(Uuid::now_v7()),
        }
    }
}

pub(crate) fn catalog() -> FixtureCatalogService {
    FixtureCatalogService::new(Catalog::from_yaml(CATALOG_YAML).expect("valid catalog fixture"))
}

pub(crate) fn coupons() -> FixtureCouponValidator {
    FixtureCouponValidator::new(coupons_from_yaml(COUPONS_YAML).expect("valid coupon fixture"))
}
