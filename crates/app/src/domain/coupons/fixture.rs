//! Coupon Fixtures

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use pitstop::{
    coupons::{CouponCode, CouponDiscount, CouponError},
    fixtures::{FixtureError, parse_percentage, parse_price},
};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

/// Coupon fixture errors.
#[derive(Debug, Error)]
pub enum CouponFixtureError {
    /// Reading or parsing a price/percentage failed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// IO error reading fixture files
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// Coupon code was invalid.
    #[error(transparent)]
    Code(#[from] CouponError),

    /// Neither `percent` nor `amount` was given.
    #[error("coupon {0} has no discount")]
    MissingDiscount(String),

    /// Both `percent` and `amount` were given.
    #[error("coupon {0} has both a percent and an amount discount")]
    AmbiguousDiscount(String),

    /// `expires_at` is not an RFC 3339 timestamp.
    #[error("coupon {0} has an invalid expiry: {1}")]
    InvalidExpiry(String, String),

    /// Two keys normalise to the same code.
    #[error("coupon {0} is defined more than once")]
    DuplicateCode(String),
}

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Map of code -> coupon fixture
    pub coupons: FxHashMap<String, CouponFixture>,
}

/// Coupon Fixture
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Percentage off (e.g. "10%")
    #[serde(default)]
    pub percent: Option<String>,

    /// Fixed amount off (e.g. "5.00 EUR")
    #[serde(default)]
    pub amount: Option<String>,

    /// Minimum pre-discount subtotal (e.g. "50.00 EUR")
    #[serde(default)]
    pub minimum_spend: Option<String>,

    /// RFC 3339 expiry timestamp
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// A validated coupon definition.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRule {
    pub discount: CouponDiscount,
    pub minimum_spend: Option<Money<'static, Currency>>,
    pub expires_at: Option<Timestamp>,
}

impl CouponRule {
    fn from_fixture(code: &str, fixture: CouponFixture) -> Result<Self, CouponFixtureError> {
        let discount = match (fixture.percent, fixture.amount) {
            (Some(percent), None) => CouponDiscount::Percent(parse_percentage(&percent)?),
            (None, Some(amount)) => CouponDiscount::Flat(parse_price(&amount)?),
            (None, None) => return Err(CouponFixtureError::MissingDiscount(code.to_string())),
            (Some(_), Some(_)) => {
                return Err(CouponFixtureError::AmbiguousDiscount(code.to_string()));
            }
        };

        let minimum_spend = fixture
            .minimum_spend
            .as_deref()
            .map(parse_price)
            .transpose()?;

        let expires_at = fixture
            .expires_at
            .as_deref()
            .map(|raw| {
                raw.parse::<Timestamp>().map_err(|err| {
                    CouponFixtureError::InvalidExpiry(code.to_string(), err.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            discount,
            minimum_spend,
            expires_at,
        })
    }
}

/// Load `<base_path>/coupons/<name>.yml`.
pub fn load_coupons(
    base_path: impl Into<PathBuf>,
    name: &str,
) -> Result<FxHashMap<CouponCode, CouponRule>, CouponFixtureError> {
    let file_path = base_path
        .into()
        .join("coupons")
        .join(format!("{name}.yml"));

    let contents = fs::read_to_string(&file_path)?;

    coupons_from_yaml(&contents)
}

/// Parse coupon definitions from YAML, keyed by normalised code.
///
/// Keys that only differ in case or surrounding whitespace are rejected.
pub fn coupons_from_yaml(
    yaml: &str,
) -> Result<FxHashMap<CouponCode, CouponRule>, CouponFixtureError> {
    let fixture: CouponsFixture = serde_norway::from_str(yaml)?;
    let mut coupons = FxHashMap::default();

    for (key, coupon) in fixture.coupons {
        let rule = CouponRule::from_fixture(&key, coupon)?;
        let code = CouponCode::new(&key)?;

        if coupons.contains_key(&code) {
            return Err(CouponFixtureError::DuplicateCode(code.to_string()));
        }

        coupons.insert(code, rule);
    }

    Ok(coupons)
}
