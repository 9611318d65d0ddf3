//! Checkout
//!
//! Turns a cart snapshot into an order draft for downstream order placement.

pub mod errors;
pub mod models;

pub use errors::CheckoutError;
pub use models::{OrderDraft, OrderLine, draft_order, draft_order_at};
