//! Coupons

pub mod errors;
pub mod fixture;
pub mod models;
pub mod service;

pub use errors::{CouponRejection, CouponValidationError};
pub use models::CouponGrant;
pub use service::*;
