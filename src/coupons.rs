//! Coupons
//!
//! A coupon code is translated into a [`CouponDiscount`] by an external
//! validator. This module only applies whatever discount it was given.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors specific to coupon handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    /// The code was empty or only whitespace.
    #[error("coupon code cannot be empty")]
    EmptyCode,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Flat discount and subtotal use different currencies.
    #[error("coupon currency {0} does not match cart currency {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Normalised coupon code: trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalise a user supplied code.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::EmptyCode`] if nothing remains after trimming.
    pub fn new(code: impl AsRef<str>) -> Result<Self, CouponError> {
        let trimmed = code.as_ref().trim();

        if trimmed.is_empty() {
            return Err(CouponError::EmptyCode);
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    /// Borrow the normalised code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discount descriptor returned by the coupon validator.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CouponDiscount {
    /// Subtract a fixed amount from the subtotal (e.g. "5 € off")
    Flat(Money<'static, Currency>),

    /// Subtract a percentage of the subtotal (e.g. "10 % off")
    Percent(Percentage),
}

impl CouponDiscount {
    /// Discount amount for the given subtotal, capped at the subtotal.
    ///
    /// # Errors
    ///
    /// - [`CouponError::CurrencyMismatch`]: flat amount is in another currency.
    /// - [`CouponError::PercentConversion`]: percentage could not be applied.
    pub fn discount_on(
        &self,
        subtotal: &Money<'static, Currency>,
    ) -> Result<Money<'static, Currency>, CouponError> {
        let currency = subtotal.currency();
        let subtotal_minor = subtotal.to_minor_units().max(0);

        let discount_minor = match self {
            Self::Flat(amount) => {
                if amount.currency() != currency {
                    return Err(CouponError::CurrencyMismatch(
                        amount.currency().iso_alpha_code,
                        currency.iso_alpha_code,
                    ));
                }

                amount.to_minor_units()
            }
            Self::Percent(percent) => percent_of_minor(percent, subtotal_minor)?,
        };

        Ok(Money::from_minor(
            discount_minor.clamp(0, subtotal_minor),
            currency,
        ))
    }

    /// Short label for logs and order records.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Flat(_) => "flat",
            Self::Percent(_) => "percent",
        }
    }
}

/// The single coupon active on a cart.
///
/// A coupon with a minimum spend stays on the cart when the subtotal drops
/// below it, but grants nothing until the subtotal reaches it again.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    /// Code entered by the customer
    pub code: CouponCode,

    /// Discount granted by the validator
    pub discount: CouponDiscount,

    /// Pre-discount subtotal the cart must reach for the discount to apply
    pub minimum_spend: Option<Money<'static, Currency>>,
}

impl AppliedCoupon {
    /// Create an applied coupon without a minimum spend.
    pub fn new(code: CouponCode, discount: CouponDiscount) -> Self {
        Self {
            code,
            discount,
            minimum_spend: None,
        }
    }

    /// Require a minimum pre-discount subtotal.
    #[must_use]
    pub fn with_minimum_spend(mut self, minimum: Money<'static, Currency>) -> Self {
        self.minimum_spend = Some(minimum);
        self
    }

    /// Whether `subtotal` reaches the minimum spend, if there is one.
    pub fn qualifies(&self, subtotal: &Money<'static, Currency>) -> bool {
        self.minimum_spend.is_none_or(|minimum| {
            minimum.currency() == subtotal.currency()
                && subtotal.to_minor_units() >= minimum.to_minor_units()
        })
    }

    /// Discount granted on `subtotal`; zero while the minimum spend is not met.
    ///
    /// # Errors
    ///
    /// Returns any error from [`CouponDiscount::discount_on`].
    pub fn discount_on(
        &self,
        subtotal: &Money<'static, Currency>,
    ) -> Result<Money<'static, Currency>, CouponError> {
        if !self.qualifies(subtotal) {
            return Ok(Money::from_minor(0, subtotal.currency()));
        }

        self.discount.discount_on(subtotal)
    }
}

/// Calculate a percentage of an amount in minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`CouponError::PercentConversion`] if the result cannot be represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, CouponError> {
    let minor = Decimal::from_i64(minor).ok_or(CouponError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(CouponError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(CouponError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, GBP};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn code_is_normalised() -> TestResult {
        let code = CouponCode::new("  winter10 ")?;

        assert_eq!(code.as_str(), "WINTER10");
        assert_eq!(CouponCode::new("WINTER10")?, code);

        Ok(())
    }

    #[test]
    fn blank_code_is_rejected() {
        assert_eq!(CouponCode::new(" \t"), Err(CouponError::EmptyCode));
    }

    #[test]
    fn flat_discount_is_taken_as_given() -> TestResult {
        let discount = CouponDiscount::Flat(Money::from_minor(500, EUR));

        let amount = discount.discount_on(&Money::from_minor(4_000, EUR))?;

        assert_eq!(amount, Money::from_minor(500, EUR));

        Ok(())
    }

    #[test]
    fn flat_discount_is_capped_at_subtotal() -> TestResult {
        let discount = CouponDiscount::Flat(Money::from_minor(5_000, EUR));

        let amount = discount.discount_on(&Money::from_minor(1_299, EUR))?;

        assert_eq!(amount, Money::from_minor(1_299, EUR));

        Ok(())
    }

    #[test]
    fn percent_discount_rounds_to_nearest_cent() -> TestResult {
        let discount = CouponDiscount::Percent(Percentage::from(0.10));

        // 10 % of 12.95 is 1.295, rounded away from zero.
        let amount = discount.discount_on(&Money::from_minor(1_295, EUR))?;

        assert_eq!(amount, Money::from_minor(130, EUR));

        Ok(())
    }

    #[test]
    fn flat_discount_in_other_currency_is_rejected() {
        let discount = CouponDiscount::Flat(Money::from_minor(500, GBP));

        let result = discount.discount_on(&Money::from_minor(4_000, EUR));

        assert_eq!(result, Err(CouponError::CurrencyMismatch("GBP", "EUR")));
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let result = percent_of_minor(&Percentage::from(2.0), i64::MAX);

        assert_eq!(result, Err(CouponError::PercentConversion));
    }

    #[test]
    fn coupon_below_minimum_spend_grants_nothing() -> TestResult {
        let coupon = AppliedCoupon::new(
            CouponCode::new("WINTER10")?,
            CouponDiscount::Percent(Percentage::from(0.1)),
        )
        .with_minimum_spend(Money::from_minor(50_00, EUR));

        assert!(!coupon.qualifies(&Money::from_minor(12_99, EUR)));
        assert_eq!(
            coupon.discount_on(&Money::from_minor(12_99, EUR))?,
            Money::from_minor(0, EUR)
        );
        assert_eq!(
            coupon.discount_on(&Money::from_minor(50_00, EUR))?,
            Money::from_minor(5_00, EUR)
        );

        Ok(())
    }

    #[test]
    fn minimum_spend_in_other_currency_never_qualifies() -> TestResult {
        let coupon = AppliedCoupon::new(
            CouponCode::new("FIVEOFF")?,
            CouponDiscount::Flat(Money::from_minor(5_00, EUR)),
        )
        .with_minimum_spend(Money::from_minor(10_00, GBP));

        assert!(!coupon.qualifies(&Money::from_minor(100_00, EUR)));

        Ok(())
    }

    #[test]
    fn kind_labels() {
        assert_eq!(CouponDiscount::Percent(Percentage::from(0.1)).kind(), "percent");
        assert_eq!(CouponDiscount::Flat(Money::from_minor(1, EUR)).kind(), "flat");
    }
}
