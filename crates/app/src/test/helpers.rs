//! Test Helpers

use pitstop::products::ProductId;
use rusty_money::{Money, iso::Currency};

pub(crate) fn product(id: &str) -> ProductId {
    ProductId::new(id).expect("valid product id")
}

pub(crate) fn eur(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, rusty_money::iso::EUR)
}
