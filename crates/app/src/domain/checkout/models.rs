//! Order drafts.

use jiff::Timestamp;
use pitstop::{
    cart::Cart,
    pricing::{PricingRules, Totals},
};
use rusty_money::{Money, iso::Currency};
use uuid::Uuid;

use crate::domain::checkout::errors::CheckoutError;

/// A single order line, priced at the snapshotted unit price.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub brand: String,
    pub quantity: u32,
    pub unit_price: Money<'static, Currency>,
    pub line_total: Money<'static, Currency>,
}

/// Everything order placement needs from a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// `PS-<yyyymmdd>-<8 hex>`
    pub order_number: String,
    pub currency: &'static Currency,
    pub lines: Vec<OrderLine>,
    pub totals: Totals,
    pub coupon_code: Option<String>,
    pub created_at: Timestamp,
}

/// Draft an order from the cart as it is now.
///
/// The cart is left untouched; clear it once the order has been placed.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: the cart has no lines.
/// - [`CheckoutError::Pricing`]: totals could not be computed.
pub fn draft_order(cart: &Cart, rules: &PricingRules) -> Result<OrderDraft, CheckoutError> {
    draft_order_at(cart, rules, Timestamp::now())
}

/// Draft an order stamped with `created_at`.
///
/// # Errors
///
/// See [`draft_order`].
pub fn draft_order_at(
    cart: &Cart,
    rules: &PricingRules,
    created_at: Timestamp,
) -> Result<OrderDraft, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let totals = cart.totals(rules)?;

    let lines = cart
        .items()
        .iter()
        .map(|item| {
            Ok(OrderLine {
                product_id: item.product_id().to_string(),
                name: item.name().to_string(),
                brand: item.brand().to_string(),
                quantity: item.quantity().get(),
                unit_price: *item.unit_price(),
                line_total: item.line_total()?,
            })
        })
        .collect::<Result<Vec<_>, CheckoutError>>()?;

    Ok(OrderDraft {
        order_number: order_number(created_at),
        currency: cart.currency(),
        lines,
        totals,
        coupon_code: cart.coupon().map(|coupon| coupon.code.to_string()),
        created_at,
    })
}

fn order_number(created_at: Timestamp) -> String {
    let suffix = Uuid::new_v4().as_fields().0;

    format!("PS-{}-{suffix:08X}", created_at.strftime("%Y%m%d"))
}
