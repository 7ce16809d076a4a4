//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod products;
pub mod profile;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show cart lines and totals.
    Show,
    /// Add units of a product, priced as the catalog lists it.
    Add {
        /// Product ID.
        product_id: String,

        /// Quantity to add.
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Set a line's quantity; zero removes it.
    Set {
        /// Product ID.
        product_id: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart.
    Remove {
        /// Product ID.
        product_id: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Print the order request without sending it.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email. Prompted for when omitted.
    #[arg(short, long)]
    pub email: Option<String>,

    /// Account password. Prompted for when omitted.
    #[arg(long, env = "SHOPKIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// Show one order.
    Get {
        /// Order ID.
        id: String,
    },
    /// List orders (admin).
    List {
        /// Zero-based page number.
        #[arg(short, long)]
        page: Option<u32>,

        /// Page size.
        #[arg(short, long)]
        size: Option<u32>,

        /// Only orders in this status (PENDING, PROCESSING, SHIPPED, DELIVERED, CANCELLED).
        #[arg(long)]
        status: Option<String>,
    },
    /// Change an order's status (admin).
    SetStatus {
        /// Order ID.
        id: String,
        /// New status.
        status: String,
        /// Apply even if the order cannot move to that status.
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// Browse the catalog.
    List {
        /// Zero-based page number.
        #[arg(short, long, default_value = "0")]
        page: u32,

        /// Page size.
        #[arg(short, long, default_value = "20")]
        size: u32,

        /// Sort order: newest, price-asc or price-desc.
        #[arg(long, default_value = "newest")]
        sort: String,

        /// Category name ("all" for every category).
        #[arg(long)]
        category: Option<String>,

        /// Search by name.
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show one product.
    Get {
        /// Product ID.
        id: String,
    },
    /// Products at or below a stock level (admin).
    LowStock {
        /// Stock level to report at.
        #[arg(short, long, default_value = "5")]
        threshold: i64,
    },
    /// List categories.
    Categories,
}

/// Arguments for the profile command.
#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: Option<ProfileCommand>,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show the account profile and addresses.
    Show,
    /// Change contact details.
    Update {
        /// New email.
        #[arg(short, long)]
        email: Option<String>,

        /// New phone number.
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Set the shipping or billing address.
    SetAddress {
        #[arg(long)]
        street: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        postal_code: String,
        #[arg(long)]
        country: String,

        /// Set the billing address instead of the shipping address.
        #[arg(long)]
        billing: bool,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Initialize a new config file.
    Init {
        /// Backend base URL to write into the file.
        #[arg(long, default_value = "http://localhost:8080/api")]
        base_url: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
