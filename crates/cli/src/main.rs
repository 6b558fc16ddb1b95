//! RocketShoes CLI - drive the cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cli cart show
//!
//! # Add one unit of product 1
//! rs-cli cart add 1
//!
//! # Set product 1 to 3 units
//! rs-cli cart update 1 3
//!
//! # Remove product 1
//! rs-cli cart remove 1
//!
//! # List remote stock
//! rs-cli stock
//! ```
//!
//! Configuration comes from `ROCKETSHOES_*` environment variables (or `.env`);
//! see `rocketshoes_cart::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// List remote stock levels
    Stock,
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart with line subtotals and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set a product's quantity
    Update {
        /// Product ID
        product_id: ProductId,
        /// New quantity (at least 1)
        amount: u32,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.json_logs);

    match run(cli).await {
        Ok(()) => {}
        // Cart errors have already been shown through the notifier
        Err(e @ commands::CommandError::Cart(_)) => {
            tracing::debug!("Command failed: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Initialize tracing with `EnvFilter`, defaulting to info for our crates.
fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cart=info,rocketshoes_cli=info,rocketshoes=warn".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let config = rocketshoes_cart::CartConfig::from_env()?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config)?,
            CartAction::Add { product_id } => commands::cart::add(&config, product_id).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&config, product_id)?,
            CartAction::Update { product_id, amount } => {
                commands::cart::update(&config, product_id, amount).await?;
            }
        },
        Commands::Stock => commands::stock::list(&config).await?,
    }
    Ok(())
}
