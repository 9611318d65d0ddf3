//! Items

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::PricingError,
    products::{CatalogEntry, ProductId},
};

/// A product entry in a cart.
///
/// Name, brand, price and image are snapshotted when the line is created and
/// are not refreshed when the catalog changes.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    product_id: ProductId,
    name: String,
    brand: String,
    unit_price: Money<'static, Currency>,
    quantity: NonZeroU32,
    image: Option<String>,
}

impl LineItem {
    /// Creates a line item from a catalog entry.
    pub fn new(product_id: ProductId, entry: &CatalogEntry, quantity: NonZeroU32) -> Self {
        Self {
            product_id,
            name: entry.name.clone(),
            brand: entry.brand.clone(),
            unit_price: entry.unit_price,
            quantity,
            image: entry.image.clone(),
        }
    }

    /// Catalog reference
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Display name at the time the line was added
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Brand at the time the line was added
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Unit price at the time the line was added
    pub fn unit_price(&self) -> &Money<'static, Currency> {
        &self.unit_price
    }

    /// Number of units, always at least one
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Image reference
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    /// Returns `unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, PricingError> {
        let minor = self
            .unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity.get()))
            .ok_or(PricingError::Overflow)?;

        Ok(Money::from_minor(minor, self.unit_price.currency()))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    fn oil_filter() -> CatalogEntry {
        CatalogEntry::new("Ölfilter", "MANN", Money::from_minor(1_299, EUR)).with_image("/mann.png")
    }

    #[test]
    fn new_snapshots_catalog_entry() -> TestResult {
        let item = LineItem::new(ProductId::new("oil-1")?, &oil_filter(), NonZeroU32::MIN);

        assert_eq!(item.name(), "Ölfilter");
        assert_eq!(item.brand(), "MANN");
        assert_eq!(item.unit_price(), &Money::from_minor(1_299, EUR));
        assert_eq!(item.image(), Some("/mann.png"));
        assert_eq!(item.quantity().get(), 1);

        Ok(())
    }

    #[test]
    fn line_total_multiplies_quantity() -> TestResult {
        let quantity = NonZeroU32::new(3).ok_or("zero")?;
        let item = LineItem::new(ProductId::new("oil-1")?, &oil_filter(), quantity);

        assert_eq!(item.line_total()?, Money::from_minor(3_897, EUR));

        Ok(())
    }

    #[test]
    fn line_total_overflow_is_reported() -> TestResult {
        let entry = CatalogEntry::new("Gold", "Bank", Money::from_minor(i64::MAX, EUR));
        let item = LineItem::new(ProductId::new("gold")?, &entry, NonZeroU32::MAX);

        assert!(matches!(item.line_total(), Err(PricingError::Overflow)));

        Ok(())
    }
}
