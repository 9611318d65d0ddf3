//! Shop configuration module

use clap::Args;
use pitstop::{fixtures::FixtureError, pricing::PricingError};
use thiserror::Error;

use crate::config::{
    collaborators::CollaboratorsConfig, fixtures::FixturesConfig, logging::LoggingConfig,
    pricing::PricingConfig,
};

pub mod collaborators;
pub mod fixtures;
pub mod logging;
pub mod pricing;

pub use logging::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid amount or currency: {0}")]
    Fixture(#[from] FixtureError),

    #[error("invalid pricing configuration: {0}")]
    Pricing(#[from] PricingError),

    #[error("VAT rate must not be negative, got {0}")]
    NegativeVatRate(rust_decimal::Decimal),

    #[error("cart TTL of {0} hours is out of range")]
    CartTtl(i64),
}

/// Pitstop shop configuration
#[derive(Debug, Args)]
pub struct ShopConfig {
    /// Shipping and VAT rules.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Catalog and coupon service settings.
    #[command(flatten)]
    pub collaborators: CollaboratorsConfig,

    /// Fixture file locations.
    #[command(flatten)]
    pub fixtures: FixturesConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
