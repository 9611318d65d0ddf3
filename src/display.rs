//! Display formatting
//!
//! Presentation only. Formatted strings are never parsed back into amounts.

use rusty_money::{Money, iso::Currency};

/// Supported display locales.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Locale {
    /// German: `1.234,56 €`
    #[default]
    De,

    /// English: `€1,234.56`
    En,
}

impl Locale {
    const fn separators(self) -> (char, char) {
        match self {
            Self::De => ('.', ','),
            Self::En => (',', '.'),
        }
    }
}

/// Format an amount for display, e.g. `89,99 €`.
pub fn format_price(money: &Money<'_, Currency>, locale: Locale) -> String {
    let currency = money.currency();
    let minor = money.to_minor_units();
    let exponent = currency.exponent;

    let divisor = 10_u64.pow(exponent);
    let abs = minor.unsigned_abs();
    let major = abs / divisor;
    let fraction = abs % divisor;

    let (group_sep, decimal_sep) = locale.separators();

    let mut number = group_thousands(major, group_sep);

    if exponent > 0 {
        number.push(decimal_sep);
        number.push_str(&format!("{fraction:0width$}", width = exponent as usize));
    }

    let sign = if minor < 0 { "-" } else { "" };

    match locale {
        Locale::De => format!("{sign}{number} {}", currency.symbol),
        Locale::En => format!("{sign}{}{number}", currency.symbol),
    }
}

/// Format a shipping cost, rendering zero as "free".
pub fn format_shipping(money: &Money<'_, Currency>, locale: Locale) -> String {
    if money.to_minor_units() != 0 {
        return format_price(money, locale);
    }

    match locale {
        Locale::De => "Kostenlos".to_string(),
        Locale::En => "Free".to_string(),
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;

    use super::*;

    #[test]
    fn german_format_uses_comma_and_trailing_symbol() {
        assert_eq!(format_price(&Money::from_minor(8_999, EUR), Locale::De), "89,99 €");
        assert_eq!(format_price(&Money::from_minor(5, EUR), Locale::De), "0,05 €");
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(
            format_price(&Money::from_minor(123_456_789, EUR), Locale::De),
            "1.234.567,89 €"
        );
        assert_eq!(
            format_price(&Money::from_minor(123_456_789, EUR), Locale::En),
            "€1,234,567.89"
        );
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(format_price(&Money::from_minor(-500, EUR), Locale::De), "-5,00 €");
    }

    #[test]
    fn zero_shipping_is_free() {
        let zero = Money::from_minor(0, EUR);

        assert_eq!(format_shipping(&zero, Locale::De), "Kostenlos");
        assert_eq!(format_shipping(&zero, Locale::En), "Free");
        assert_eq!(
            format_shipping(&Money::from_minor(599, EUR), Locale::De),
            "5,99 €"
        );
    }
}
