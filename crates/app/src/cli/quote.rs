use pitstop_app::{
    context::AppContext,
    domain::carts::models::CartOwner,
};
use uuid::Uuid;

use crate::cli::cart::{self, CartArgs};

pub(crate) async fn run(context: &AppContext, args: CartArgs) -> Result<(), String> {
    let owner = CartOwner::Session(Uuid::now_v7());

    let view = cart::build(context, owner, args).await?;

    cart::print_lines(&view)?;
    cart::print_totals(&view, &view.totals, &context.rules);

    Ok(())
}
