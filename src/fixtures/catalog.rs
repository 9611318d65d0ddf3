//! Catalog Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, parse_price},
    products::CatalogEntry,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Brand or manufacturer
    pub brand: String,

    /// Gross price (e.g., "89.99 EUR")
    pub price: String,

    /// Optional image reference
    #[serde(default)]
    pub image: Option<String>,

    /// Stock flag, defaults to in stock
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,
}

fn in_stock_default() -> bool {
    true
}

impl TryFrom<ProductFixture> for CatalogEntry {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        Ok(CatalogEntry {
            name: fixture.name,
            brand: fixture.brand,
            unit_price: parse_price(&fixture.price)?,
            image: fixture.image,
            in_stock: fixture.in_stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::EUR};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_fixture_defaults() -> TestResult {
        let fixture: ProductFixture = serde_norway::from_str(
            r"
name: Luftfilter
brand: MANN
price: 19.90 EUR
",
        )?;

        let entry = CatalogEntry::try_from(fixture)?;

        assert_eq!(entry.unit_price, Money::from_minor(1_990, EUR));
        assert!(entry.in_stock);
        assert!(entry.image.is_none());

        Ok(())
    }

    #[test]
    fn product_fixture_with_bad_price_fails() -> TestResult {
        let fixture: ProductFixture = serde_norway::from_str(
            r"
name: Luftfilter
brand: MANN
price: cheap
",
        )?;

        assert!(matches!(
            CatalogEntry::try_from(fixture),
            Err(FixtureError::InvalidPrice(_))
        ));

        Ok(())
    }
}
