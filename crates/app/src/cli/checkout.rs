use pitstop_app::{
    context::AppContext,
    domain::carts::models::CartOwner,
};
use uuid::Uuid;

use crate::cli::cart::{self, CartArgs};

pub(crate) async fn run(context: &AppContext, args: CartArgs) -> Result<(), String> {
    let owner = CartOwner::Session(Uuid::now_v7());

    let view = cart::build(context, owner, args).await?;

    let draft = context
        .carts
        .draft_order(owner)
        .await
        .map_err(|error| format!("failed to draft order: {error}"))?;

    println!("Bestellnummer: {}", draft.order_number);
    println!();

    cart::print_lines(&view)?;
    cart::print_totals(&view, &draft.totals, &context.rules);

    context
        .carts
        .clear_cart(owner)
        .await
        .map_err(|error| format!("failed to clear cart: {error}"))?;

    Ok(())
}
