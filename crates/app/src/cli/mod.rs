use clap::{Parser, Subcommand};
use pitstop_app::{config::ShopConfig, context::AppContext, observability::init_logging};

mod cart;
mod checkout;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "pitstop", about = "Pitstop cart and pricing CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: ShopConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price a cart without placing an order
    Quote(cart::CartArgs),

    /// Price a cart, draft the order and clear the cart
    Checkout(cart::CartArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        init_logging(&self.config.logging).map_err(|error| error.to_string())?;

        let context = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::Quote(args) => quote::run(&context, args).await,
            Commands::Checkout(args) => checkout::run(&context, args).await,
        }
    }
}
