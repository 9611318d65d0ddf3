//! Coupon models.

use pitstop::coupons::{AppliedCoupon, CouponCode, CouponDiscount};
use rusty_money::{Money, iso::Currency};

/// What a validator grants for an accepted code.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CouponGrant {
    /// Discount descriptor re-applied to the subtotal on every read
    pub discount: CouponDiscount,

    /// Subtotal below which the discount lapses
    pub minimum_spend: Option<Money<'static, Currency>>,
}

impl CouponGrant {
    /// A grant without a minimum spend.
    pub fn new(discount: CouponDiscount) -> Self {
        Self {
            discount,
            minimum_spend: None,
        }
    }

    /// Attach the grant to a cart under `code`.
    pub fn applied_as(self, code: CouponCode) -> AppliedCoupon {
        let coupon = AppliedCoupon::new(code, self.discount);

        match self.minimum_spend {
            Some(minimum) => coupon.with_minimum_spend(minimum),
            None => coupon,
        }
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn applied_coupon_keeps_minimum_spend() -> TestResult {
        let grant = CouponGrant {
            discount: CouponDiscount::Percent(Percentage::from(0.1)),
            minimum_spend: Some(Money::from_minor(50_00, EUR)),
        };

        let coupon = grant.applied_as(CouponCode::new("winter10")?);

        assert_eq!(coupon.code.as_str(), "WINTER10");
        assert_eq!(coupon.minimum_spend, Some(Money::from_minor(50_00, EUR)));

        Ok(())
    }
}
