//! Pitstop prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, QuantityChange},
    coupons::{AppliedCoupon, CouponCode, CouponDiscount, CouponError},
    display::{Locale, format_price, format_shipping},
    items::LineItem,
    pricing::{PricingError, PricingRules, Totals, compute_totals, remaining_for_free_shipping},
    products::{CatalogEntry, ProductId, ProductIdError},
};
