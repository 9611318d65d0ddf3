use std::str::FromStr;

use clap::Args;
use pitstop::{
    display::{Locale, format_price, format_shipping},
    pricing::{PricingRules, Totals, remaining_for_free_shipping},
    products::ProductId,
};
use pitstop_app::{
    context::AppContext,
    domain::carts::models::{CartOwner, CartView},
};

/// A `ID:QTY` cart line from the command line.
#[derive(Debug, Clone)]
pub(crate) struct LineArg {
    product: ProductId,
    quantity: u32,
}

impl FromStr for LineArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = s.rsplit_once(':').unwrap_or((s, "1"));

        let product = ProductId::new(id).map_err(|error| error.to_string())?;
        let quantity = quantity
            .trim()
            .parse::<u32>()
            .map_err(|error| format!("invalid quantity in {s:?}: {error}"))?;

        Ok(Self { product, quantity })
    }
}

#[derive(Debug, Args)]
pub(crate) struct CartArgs {
    /// Product to add, as ID or ID:QTY (repeatable)
    #[arg(long = "add", value_name = "ID:QTY", required = true)]
    lines: Vec<LineArg>,

    /// Coupon code to apply
    #[arg(long)]
    coupon: Option<String>,
}

/// Fill a fresh cart from the command line arguments.
pub(crate) async fn build(
    context: &AppContext,
    owner: CartOwner,
    args: CartArgs,
) -> Result<CartView, String> {
    let mut view = context
        .carts
        .get_cart(owner)
        .await
        .map_err(|error| error.to_string())?;

    for line in args.lines {
        view = context
            .carts
            .add_item(owner, line.product.clone(), line.quantity)
            .await
            .map_err(|error| format!("cannot add {}: {error}", line.product))?;
    }

    if let Some(code) = args.coupon {
        view = context
            .carts
            .apply_coupon(owner, code)
            .await
            .map_err(|error| error.to_string())?;
    }

    Ok(view)
}

pub(crate) fn print_lines(view: &CartView) -> Result<(), String> {
    for item in view.cart.items() {
        let line_total = item.line_total().map_err(|error| error.to_string())?;

        println!(
            "{:<24} {:<10} {:>3} x {:>10}  {:>10}",
            item.name(),
            item.brand(),
            item.quantity(),
            format_price(item.unit_price(), Locale::De),
            format_price(&line_total, Locale::De),
        );
    }

    Ok(())
}

pub(crate) fn print_totals(view: &CartView, totals: &Totals, rules: &PricingRules) {
    println!();
    println!("Zwischensumme:  {:>12}", format_price(&totals.subtotal, Locale::De));

    if let Some(coupon) = view.cart.coupon() {
        match coupon.minimum_spend {
            Some(minimum) if !coupon.qualifies(&totals.subtotal) => println!(
                "Rabatt ({}): Mindestbestellwert {} nicht erreicht",
                coupon.code,
                format_price(&minimum, Locale::De)
            ),
            _ => println!(
                "Rabatt ({}): -{}",
                coupon.code,
                format_price(&totals.discount, Locale::De)
            ),
        }
    }

    println!("Versand:        {:>12}", format_shipping(&totals.shipping, Locale::De));
    println!("Gesamt:         {:>12}", format_price(&totals.total, Locale::De));
    println!("inkl. MwSt.:    {:>12}", format_price(&totals.vat_included, Locale::De));

    let remaining = remaining_for_free_shipping(&totals.subtotal, rules);

    if remaining.to_minor_units() > 0 {
        println!(
            "Noch {} bis zum kostenlosen Versand",
            format_price(&remaining, Locale::De)
        );
    }
}
