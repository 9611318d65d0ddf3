//! Pricing
//!
//! Totals are derived from the line items and the applied coupon on every
//! call; nothing here is cached.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money,
    iso::{Currency, EUR},
};
use thiserror::Error;

use crate::{
    coupons::{AppliedCoupon, CouponError},
    items::LineItem,
};

/// Free shipping threshold in the default configuration (120.00).
pub const FREE_SHIPPING_THRESHOLD_MINOR: i64 = 120_00;

/// Flat shipping fee in the default configuration (5.99).
pub const SHIPPING_FEE_MINOR: i64 = 5_99;

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// An amount did not fit in minor units.
    #[error("amount overflowed")]
    Overflow,

    /// A configured amount is in another currency than the cart.
    #[error("pricing rule currency {0} does not match cart currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// A configured amount was negative.
    #[error("pricing rule amounts must not be negative")]
    NegativeAmount,

    /// Applying the coupon failed.
    #[error(transparent)]
    Coupon(#[from] CouponError),
}

/// Shipping and tax rules applied to every cart.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PricingRules {
    free_shipping_threshold: Money<'static, Currency>,
    shipping_fee: Money<'static, Currency>,
    vat_rate: Percentage,
}

impl PricingRules {
    /// Create pricing rules.
    ///
    /// # Errors
    ///
    /// - [`PricingError::CurrencyMismatch`]: threshold and fee use different currencies.
    /// - [`PricingError::NegativeAmount`]: threshold or fee is negative.
    pub fn new(
        free_shipping_threshold: Money<'static, Currency>,
        shipping_fee: Money<'static, Currency>,
        vat_rate: Percentage,
    ) -> Result<Self, PricingError> {
        if free_shipping_threshold.currency() != shipping_fee.currency() {
            return Err(PricingError::CurrencyMismatch(
                shipping_fee.currency().iso_alpha_code,
                free_shipping_threshold.currency().iso_alpha_code,
            ));
        }

        if free_shipping_threshold.to_minor_units() < 0 || shipping_fee.to_minor_units() < 0 {
            return Err(PricingError::NegativeAmount);
        }

        Ok(Self {
            free_shipping_threshold,
            shipping_fee,
            vat_rate,
        })
    }

    /// Minimum pre-discount subtotal for free shipping
    pub fn free_shipping_threshold(&self) -> &Money<'static, Currency> {
        &self.free_shipping_threshold
    }

    /// Shipping fee below the threshold
    pub fn shipping_fee(&self) -> &Money<'static, Currency> {
        &self.shipping_fee
    }

    /// VAT rate contained in gross prices
    pub fn vat_rate(&self) -> Percentage {
        self.vat_rate
    }

    /// Currency of the configured amounts
    pub fn currency(&self) -> &'static Currency {
        self.shipping_fee.currency()
    }
}

impl Default for PricingRules {
    /// 120.00 EUR free shipping threshold, 5.99 EUR fee, 19 % VAT.
    fn default() -> Self {
        Self {
            free_shipping_threshold: Money::from_minor(FREE_SHIPPING_THRESHOLD_MINOR, EUR),
            shipping_fee: Money::from_minor(SHIPPING_FEE_MINOR, EUR),
            vat_rate: Percentage::from(0.19),
        }
    }
}

/// Computed cart totals.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Totals {
    /// Sum of all line totals
    pub subtotal: Money<'static, Currency>,

    /// Shipping cost, zero above the threshold or for an empty cart
    pub shipping: Money<'static, Currency>,

    /// Coupon discount, never more than the subtotal
    pub discount: Money<'static, Currency>,

    /// `subtotal - discount + shipping`, never negative
    pub total: Money<'static, Currency>,

    /// VAT portion contained in `total`
    pub vat_included: Money<'static, Currency>,
}

impl Totals {
    /// All-zero totals in the given currency.
    pub fn zero(currency: &'static Currency) -> Self {
        let zero = Money::from_minor(0, currency);

        Self {
            subtotal: zero,
            shipping: zero,
            discount: zero,
            total: zero,
            vat_included: zero,
        }
    }

    /// Whether shipping was waived for a non-empty cart.
    pub fn has_free_shipping(&self) -> bool {
        self.subtotal.to_minor_units() > 0 && self.shipping.to_minor_units() == 0
    }
}

/// Sum of `unit_price × quantity` over all items.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: the sum does not fit in minor units.
/// - [`PricingError::CurrencyMismatch`]: an item is priced in another currency.
pub fn subtotal(
    items: &[LineItem],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor = items.iter().try_fold(0_i64, |acc, item| {
        let line = item.line_total()?;

        if line.currency() != currency {
            return Err(PricingError::CurrencyMismatch(
                line.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        acc.checked_add(line.to_minor_units())
            .ok_or(PricingError::Overflow)
    })?;

    Ok(Money::from_minor(minor, currency))
}

/// Compute subtotal, shipping, discount and total.
///
/// The free shipping threshold is evaluated against the pre-discount
/// subtotal. The discount is taken from the subtotal only, so shipping is
/// never discounted. A coupon whose minimum spend is not met grants nothing.
///
/// # Errors
///
/// Returns a [`PricingError`] on overflow, currency mismatch or a coupon that
/// cannot be applied.
pub fn compute_totals(
    items: &[LineItem],
    coupon: Option<&AppliedCoupon>,
    rules: &PricingRules,
) -> Result<Totals, PricingError> {
    let currency = rules.currency();

    if items.is_empty() {
        return Ok(Totals::zero(currency));
    }

    let subtotal = subtotal(items, currency)?;
    let subtotal_minor = subtotal.to_minor_units();

    let shipping_minor = if subtotal_minor >= rules.free_shipping_threshold.to_minor_units() {
        0
    } else {
        rules.shipping_fee.to_minor_units()
    };

    let discount_minor = match coupon {
        Some(coupon) => coupon.discount_on(&subtotal)?.to_minor_units(),
        None => 0,
    };

    let total_minor = subtotal_minor
        .checked_sub(discount_minor)
        .and_then(|net| net.checked_add(shipping_minor))
        .ok_or(PricingError::Overflow)?
        .max(0);

    let vat_minor = vat_included_minor(total_minor, &rules.vat_rate)?;

    Ok(Totals {
        subtotal,
        shipping: Money::from_minor(shipping_minor, currency),
        discount: Money::from_minor(discount_minor, currency),
        total: Money::from_minor(total_minor, currency),
        vat_included: Money::from_minor(vat_minor, currency),
    })
}

/// Amount still missing until shipping is free, zero once it is reached.
pub fn remaining_for_free_shipping(
    subtotal: &Money<'static, Currency>,
    rules: &PricingRules,
) -> Money<'static, Currency> {
    let remaining = rules
        .free_shipping_threshold
        .to_minor_units()
        .saturating_sub(subtotal.to_minor_units())
        .max(0);

    Money::from_minor(remaining, subtotal.currency())
}

/// VAT contained in a gross amount: `gross - gross / (1 + rate)`.
fn vat_included_minor(gross_minor: i64, rate: &Percentage) -> Result<i64, PricingError> {
    let gross = Decimal::from_i64(gross_minor).ok_or(PricingError::Overflow)?;
    let divisor = ((*rate) * Decimal::ONE)
        .checked_add(Decimal::ONE)
        .ok_or(PricingError::Overflow)?;

    let net = gross.checked_div(divisor).ok_or(PricingError::Overflow)?;

    (gross - net)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{
        coupons::{CouponCode, CouponDiscount},
        products::{CatalogEntry, ProductId},
    };

    use super::*;

    fn line(id: &str, price_minor: i64, quantity: u32) -> TestResult<LineItem> {
        let entry = CatalogEntry::new(id, "Bosch", Money::from_minor(price_minor, EUR));
        let quantity = NonZeroU32::new(quantity).ok_or("zero quantity")?;

        Ok(LineItem::new(ProductId::new(id)?, &entry, quantity))
    }

    fn coupon(discount: CouponDiscount) -> TestResult<AppliedCoupon> {
        Ok(AppliedCoupon::new(CouponCode::new("TEST")?, discount))
    }

    #[test]
    fn empty_items_yield_zero_totals() -> TestResult {
        let totals = compute_totals(&[], None, &PricingRules::default())?;

        assert_eq!(totals, Totals::zero(EUR));
        assert!(!totals.has_free_shipping());

        Ok(())
    }

    #[test]
    fn shipping_charged_below_threshold() -> TestResult {
        let totals = compute_totals(&[line("p2", 12_99, 1)?], None, &PricingRules::default())?;

        assert_eq!(totals.subtotal, Money::from_minor(12_99, EUR));
        assert_eq!(totals.shipping, Money::from_minor(5_99, EUR));
        assert_eq!(totals.total, Money::from_minor(18_98, EUR));

        Ok(())
    }

    #[test]
    fn shipping_free_at_threshold() -> TestResult {
        let totals = compute_totals(&[line("p", 120_00, 1)?], None, &PricingRules::default())?;

        assert_eq!(totals.shipping, Money::from_minor(0, EUR));
        assert!(totals.has_free_shipping());

        Ok(())
    }

    #[test]
    fn threshold_uses_pre_discount_subtotal() -> TestResult {
        let items = [line("p", 130_00, 1)?];
        let coupon = coupon(CouponDiscount::Flat(Money::from_minor(20_00, EUR)))?;

        let totals = compute_totals(&items, Some(&coupon), &PricingRules::default())?;

        assert_eq!(totals.shipping, Money::from_minor(0, EUR));
        assert_eq!(totals.discount, Money::from_minor(20_00, EUR));
        assert_eq!(totals.total, Money::from_minor(110_00, EUR));

        Ok(())
    }

    #[test]
    fn shipping_is_never_discounted() -> TestResult {
        let items = [line("p", 10_00, 1)?];
        let coupon = coupon(CouponDiscount::Flat(Money::from_minor(50_00, EUR)))?;

        let totals = compute_totals(&items, Some(&coupon), &PricingRules::default())?;

        assert_eq!(totals.discount, Money::from_minor(10_00, EUR));
        assert_eq!(totals.total, Money::from_minor(5_99, EUR));

        Ok(())
    }

    #[test]
    fn percent_coupon_applies_to_subtotal() -> TestResult {
        let items = [line("p", 50_00, 2)?];
        let coupon = coupon(CouponDiscount::Percent(Percentage::from(0.15)))?;

        let totals = compute_totals(&items, Some(&coupon), &PricingRules::default())?;

        assert_eq!(totals.discount, Money::from_minor(15_00, EUR));
        assert_eq!(totals.shipping, Money::from_minor(5_99, EUR));
        assert_eq!(totals.total, Money::from_minor(90_99, EUR));

        Ok(())
    }

    #[test]
    fn coupon_below_minimum_spend_is_not_discounted() -> TestResult {
        let items = [line("p2", 12_99, 1)?];
        let coupon = coupon(CouponDiscount::Percent(Percentage::from(0.1)))?
            .with_minimum_spend(Money::from_minor(50_00, EUR));

        let totals = compute_totals(&items, Some(&coupon), &PricingRules::default())?;

        assert_eq!(totals.discount, Money::from_minor(0, EUR));
        assert_eq!(totals.total, Money::from_minor(18_98, EUR));

        Ok(())
    }

    #[test]
    fn vat_included_in_gross_total() -> TestResult {
        let totals = compute_totals(&[line("p", 119_00, 1)?], None, &PricingRules::default())?;

        // 124.99 gross at 19 % contains 19.96 VAT.
        assert_eq!(totals.total, Money::from_minor(124_99, EUR));
        assert_eq!(totals.vat_included, Money::from_minor(19_96, EUR));

        Ok(())
    }

    #[test]
    fn remaining_for_free_shipping_counts_down() {
        let rules = PricingRules::default();

        assert_eq!(
            remaining_for_free_shipping(&Money::from_minor(100_01, EUR), &rules),
            Money::from_minor(19_99, EUR)
        );
        assert_eq!(
            remaining_for_free_shipping(&Money::from_minor(150_00, EUR), &rules),
            Money::from_minor(0, EUR)
        );
    }

    #[test]
    fn rules_reject_mixed_currencies() {
        let result = PricingRules::new(
            Money::from_minor(100, EUR),
            Money::from_minor(100, GBP),
            Percentage::from(0.2),
        );

        assert_eq!(result, Err(PricingError::CurrencyMismatch("GBP", "EUR")));
    }

    #[test]
    fn rules_reject_negative_fee() {
        let result = PricingRules::new(
            Money::from_minor(100, EUR),
            Money::from_minor(-1, EUR),
            Percentage::from(0.2),
        );

        assert_eq!(result, Err(PricingError::NegativeAmount));
    }

    #[test]
    fn subtotal_rejects_items_in_other_currency() -> TestResult {
        let entry = CatalogEntry::new("Wischer", "Bosch", Money::from_minor(9_99, GBP));
        let item = LineItem::new(ProductId::new("w")?, &entry, NonZeroU32::MIN);

        assert_eq!(
            subtotal(&[item], EUR),
            Err(PricingError::CurrencyMismatch("GBP", "EUR"))
        );

        Ok(())
    }
}
