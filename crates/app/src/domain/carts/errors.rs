//! Carts service errors.

use std::fmt;

use pitstop::{cart::CartError, pricing::PricingError, products::ProductId};
use thiserror::Error;

use crate::domain::{
    carts::repository::RepositoryError, checkout::CheckoutError, coupons::CouponRejection,
};

/// External system a cart operation depends on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Collaborator {
    Catalog,
    Coupons,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => f.write_str("catalog"),
            Self::Coupons => f.write_str("coupon validator"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    #[error("coupon rejected: {0}")]
    CouponRejected(#[from] CouponRejection),

    #[error("{collaborator} unavailable: {reason}")]
    CollaboratorUnavailable {
        collaborator: Collaborator,
        reason: String,
    },

    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Cart(CartError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Storage(#[from] RepositoryError),

    #[error("failed to compute cart expiry: {0}")]
    Expiry(#[from] jiff::Error),
}

impl From<CartError> for CartsServiceError {
    fn from(error: CartError) -> Self {
        match error {
            CartError::InvalidQuantity(quantity) => Self::InvalidQuantity(quantity),
            error @ (CartError::CurrencyMismatch(..) | CartError::NegativePrice(_)) => {
                Self::Cart(error)
            }
        }
    }
}

impl From<CheckoutError> for CartsServiceError {
    fn from(error: CheckoutError) -> Self {
        match error {
            CheckoutError::EmptyCart => Self::EmptyCart,
            CheckoutError::Pricing(source) => Self::Pricing(source),
        }
    }
}
