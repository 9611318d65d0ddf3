//! Pricing Config

use clap::Args;
use decimal_percentage::Percentage;
use pitstop::{
    fixtures::{decimal_to_minor, parse_currency},
    pricing::PricingRules,
};
use rust_decimal::Decimal;
use rusty_money::Money;

use crate::config::ConfigError;

/// Shipping and VAT settings.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// Pre-discount subtotal from which shipping is free
    #[arg(long, env = "FREE_SHIPPING_THRESHOLD", default_value = "120.00")]
    pub free_shipping_threshold: Decimal,

    /// Shipping fee below the threshold
    #[arg(long, env = "SHIPPING_FEE", default_value = "5.99")]
    pub shipping_fee: Decimal,

    /// VAT rate contained in gross prices, as a fraction
    #[arg(long, env = "VAT_RATE", default_value = "0.19")]
    pub vat_rate: Decimal,

    /// ISO currency code for carts and rules
    #[arg(long, env = "CURRENCY", default_value = "EUR")]
    pub currency: String,
}

impl PricingConfig {
    /// Build validated pricing rules.
    pub fn pricing_rules(&self) -> Result<PricingRules, ConfigError> {
        let currency = parse_currency(&self.currency)?;

        if self.vat_rate.is_sign_negative() {
            return Err(ConfigError::NegativeVatRate(self.vat_rate));
        }

        Ok(PricingRules::new(
            Money::from_minor(decimal_to_minor(self.free_shipping_threshold)?, currency),
            Money::from_minor(decimal_to_minor(self.shipping_fee)?, currency),
            Percentage::from(self.vat_rate),
        )?)
    }
}
