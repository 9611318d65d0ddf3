//! Collaborator Config

use std::time::Duration;

use clap::Args;
use jiff::SignedDuration;

use crate::{config::ConfigError, domain::carts::CartSettings};

/// Catalog, coupon service and cart lifetime settings.
#[derive(Debug, Args)]
pub struct CollaboratorsConfig {
    /// Timeout for a single catalog or coupon call, in milliseconds
    #[arg(long, env = "COLLABORATOR_TIMEOUT_MS", default_value_t = 3_000)]
    pub collaborator_timeout_ms: u64,

    /// Hours an untouched cart is kept
    #[arg(long, env = "CART_TTL_HOURS", default_value_t = 72)]
    pub cart_ttl_hours: i64,
}

impl CollaboratorsConfig {
    /// Build cart service settings; the TTL must be a positive number of hours.
    pub fn cart_settings(&self) -> Result<CartSettings, ConfigError> {
        let cart_ttl = self
            .cart_ttl_hours
            .checked_mul(3_600)
            .filter(|secs| *secs > 0)
            .map(SignedDuration::from_secs)
            .ok_or(ConfigError::CartTtl(self.cart_ttl_hours))?;

        Ok(CartSettings {
            collaborator_timeout: Duration::from_millis(self.collaborator_timeout_ms),
            cart_ttl,
        })
    }
}
