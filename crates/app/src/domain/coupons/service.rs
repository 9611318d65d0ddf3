//! Coupon validation service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pitstop::coupons::CouponCode;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::domain::coupons::{
    errors::{CouponRejection, CouponValidationError},
    fixture::CouponRule,
    models::CouponGrant,
};

/// Coupon validator backed by a loaded YAML fixture.
#[derive(Debug, Clone, Default)]
pub struct FixtureCouponValidator {
    rules: FxHashMap<CouponCode, CouponRule>,
}

impl FixtureCouponValidator {
    #[must_use]
    pub fn new(rules: FxHashMap<CouponCode, CouponRule>) -> Self {
        Self { rules }
    }

    /// Validate a code at the given point in time.
    pub fn validate_at(
        &self,
        code: &CouponCode,
        subtotal: &Money<'static, Currency>,
        point_in_time: Timestamp,
    ) -> Result<CouponGrant, CouponRejection> {
        let rule = self
            .rules
            .get(code)
            .ok_or_else(|| CouponRejection::Unknown(code.to_string()))?;

        if rule
            .expires_at
            .is_some_and(|expires_at| expires_at <= point_in_time)
        {
            return Err(CouponRejection::Expired(code.to_string()));
        }

        if let Some(minimum) = rule.minimum_spend {
            let met = minimum.currency() == subtotal.currency()
                && subtotal.to_minor_units() >= minimum.to_minor_units();

            if !met {
                return Err(CouponRejection::MinimumSpendNotMet { minimum });
            }
        }

        Ok(CouponGrant {
            discount: rule.discount,
            minimum_spend: rule.minimum_spend,
        })
    }
}

#[async_trait]
impl CouponValidator for FixtureCouponValidator {
    async fn validate(
        &self,
        code: &CouponCode,
        subtotal: Money<'static, Currency>,
    ) -> Result<CouponGrant, CouponValidationError> {
        debug!(coupon_code = %code, "validating coupon");

        Ok(self.validate_at(code, &subtotal, Timestamp::now())?)
    }
}

#[automock]
#[async_trait]
pub trait CouponValidator: Send + Sync {
    /// Translate a code into a discount for the given pre-discount subtotal.
    async fn validate(
        &self,
        code: &CouponCode,
        subtotal: Money<'static, Currency>,
    ) -> Result<CouponGrant, CouponValidationError>;
}
