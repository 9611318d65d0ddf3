//! Pitstop
//!
//! Cart and pricing engine for the parts shop: line items, a single coupon,
//! shipping threshold rules and derived totals.

pub mod cart;
pub mod coupons;
pub mod display;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod products;
