//! Fixture Config

use std::path::PathBuf;

use clap::Args;

/// Where the catalog and coupon fixtures live.
#[derive(Debug, Args)]
pub struct FixturesConfig {
    /// Base directory holding `catalog/` and `coupons/`
    #[arg(long, env = "FIXTURES_PATH", default_value = "./fixtures")]
    pub fixtures_path: PathBuf,

    /// Catalog fixture name, without extension
    #[arg(long, env = "CATALOG_FIXTURE", default_value = "shop")]
    pub catalog: String,

    /// Coupon fixture name, without extension
    #[arg(long, env = "COUPON_FIXTURE", default_value = "shop")]
    pub coupons: String,
}
