//! Cart

use std::num::NonZeroU32;

use rusty_money::{
    Money,
    iso::{Currency, EUR},
};
use thiserror::Error;

use crate::{
    coupons::AppliedCoupon,
    items::LineItem,
    pricing::{self, PricingError, PricingRules, Totals},
    products::{CatalogEntry, ProductId},
};

/// Errors related to cart mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantity was zero or out of range for an operation that requires a positive value.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// The product's currency differs from the cart currency (product, product currency, cart currency).
    #[error("product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// The product's unit price is below zero.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// Outcome of [`Cart::update_quantity`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has the given quantity.
    Updated(NonZeroU32),

    /// The line was removed because the new quantity was zero or less.
    Removed,

    /// The product is not in the cart; nothing changed.
    Unchanged,
}

/// The line items and coupon of a single cart owner.
///
/// Item count, subtotal and totals are always derived from the current
/// items; the cart stores no running totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    coupon: Option<AppliedCoupon>,
    currency: &'static Currency,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(EUR)
    }
}

impl Cart {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            coupon: None,
            currency,
        }
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line for the same product has its quantity increased;
    /// its snapshotted name, brand and price are kept. Otherwise a new line
    /// is appended from the catalog entry.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero or the accumulated quantity overflows.
    /// - [`CartError::CurrencyMismatch`]: the entry is priced in another currency.
    /// - [`CartError::NegativePrice`]: the entry has a price below zero.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        entry: &CatalogEntry,
        quantity: u32,
    ) -> Result<(), CartError> {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            return Err(CartError::InvalidQuantity(0));
        };

        if let Some(existing) = self.line_mut(&product_id) {
            let accumulated = existing
                .quantity()
                .checked_add(quantity.get())
                .ok_or(CartError::InvalidQuantity(i64::from(quantity.get())))?;

            existing.set_quantity(accumulated);

            return Ok(());
        }

        let item_currency = entry.unit_price.currency();
        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product_id,
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if entry.unit_price.to_minor_units() < 0 {
            return Err(CartError::NegativePrice(product_id));
        }

        self.items.push(LineItem::new(product_id, entry, quantity));

        Ok(())
    }

    /// Set the quantity of a line.
    ///
    /// A quantity of zero or less removes the line. Unknown products are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `new_quantity` exceeds `u32::MAX`;
    /// the cart is left unchanged.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        new_quantity: i64,
    ) -> Result<QuantityChange, CartError> {
        if self.line(product_id).is_none() {
            return Ok(QuantityChange::Unchanged);
        }

        if new_quantity <= 0 {
            self.remove_item(product_id);

            return Ok(QuantityChange::Removed);
        }

        let quantity = u32::try_from(new_quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(CartError::InvalidQuantity(new_quantity))?;

        if let Some(line) = self.line_mut(product_id) {
            line.set_quantity(quantity);
        }

        Ok(QuantityChange::Updated(quantity))
    }

    /// Remove a line, returning it if it was present.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<LineItem> {
        let idx = self
            .items
            .iter()
            .position(|item| item.product_id() == product_id)?;

        Some(self.items.remove(idx))
    }

    /// Make `coupon` the active coupon, returning the one it replaced.
    pub fn apply_coupon(&mut self, coupon: AppliedCoupon) -> Option<AppliedCoupon> {
        self.coupon.replace(coupon)
    }

    /// Remove the active coupon.
    pub fn remove_coupon(&mut self) -> Option<AppliedCoupon> {
        self.coupon.take()
    }

    /// Empty the cart, e.g. after an order was placed.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Find the line for a product.
    pub fn line(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
    }

    /// The active coupon, if any.
    pub fn coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.as_ref()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity().get()))
            .sum()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of all line totals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the sum overflows.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        pricing::subtotal(&self.items, self.currency)
    }

    /// Compute the totals for the current items and coupon.
    ///
    /// # Errors
    ///
    /// - [`PricingError::CurrencyMismatch`]: `rules` use another currency than the cart.
    /// - any error from [`pricing::compute_totals`].
    pub fn totals(&self, rules: &PricingRules) -> Result<Totals, PricingError> {
        if rules.currency() != self.currency {
            return Err(PricingError::CurrencyMismatch(
                rules.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        pricing::compute_totals(&self.items, self.coupon.as_ref(), rules)
    }
}
