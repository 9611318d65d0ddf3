//! Checkout errors.

use pitstop::pricing::PricingError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Orders need at least one line.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    #[error(transparent)]
    Pricing(#[from] PricingError),
}
