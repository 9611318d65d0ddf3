//! Coupon validation errors.

use pitstop::display::{Locale, format_price};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Why a coupon code was declined.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CouponRejection {
    /// The code was blank.
    #[error("coupon code is empty")]
    EmptyCode,

    /// No coupon exists with this code.
    #[error("coupon {0} does not exist")]
    Unknown(String),

    /// The coupon is no longer valid.
    #[error("coupon {0} has expired")]
    Expired(String),

    /// The cart subtotal is below the coupon's minimum spend.
    #[error("minimum spend of {} not met", format_price(.minimum, Locale::De))]
    MinimumSpendNotMet {
        /// Required pre-discount subtotal
        minimum: Money<'static, Currency>,
    },
}

/// Coupon validator error variants.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CouponValidationError {
    /// The validator declined the code.
    #[error(transparent)]
    Rejected(#[from] CouponRejection),

    /// The validator could not be reached or failed.
    #[error("coupon validator unavailable: {0}")]
    Unavailable(String),
}
