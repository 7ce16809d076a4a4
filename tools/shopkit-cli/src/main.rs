//! ShopKit CLI - Command-line storefront client.
//!
//! Commands:
//! - `shopkit products` - Browse the catalog
//! - `shopkit cart` - Show and edit the persisted cart
//! - `shopkit checkout` - Place an order for the cart
//! - `shopkit login` / `logout` / `whoami` - Manage the signed-in account
//! - `shopkit profile` - Show and edit the account profile
//! - `shopkit orders` - Look up orders; list and update them as an admin
//! - `shopkit config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    CartArgs, CheckoutArgs, ConfigArgs, LoginArgs, OrdersArgs, ProductsArgs, ProfileArgs,
};

/// ShopKit CLI - Shop from the terminal
#[derive(Parser)]
#[command(name = "shopkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products and categories
    Products(ProductsArgs),

    /// Show and edit the cart
    Cart(CartArgs),

    /// Place an order for the cart contents
    Checkout(CheckoutArgs),

    /// Sign in
    Login(LoginArgs),

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Show and edit the account profile
    Profile(ProfileArgs),

    /// Look up and manage orders
    Orders(OrdersArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Install the log subscriber. `RUST_LOG` wins unless `--verbose` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Login(args) => commands::auth::login(args, &ctx).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Profile(args) => commands::profile::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
