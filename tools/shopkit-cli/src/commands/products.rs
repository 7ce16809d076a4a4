//! Catalog commands.

use anyhow::{bail, Context as _, Result};
use shopkit_commerce::catalog::{Product, ProductQuery, ProductSort};
use shopkit_commerce::{Currency, ProductId};

use super::{ProductsArgs, ProductsCommand};
use crate::context::Context;

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let auth = ctx.auth(&store);
    let api = ctx.products(&auth);
    let currency = ctx.config.cart.currency;

    match args.command {
        ProductsCommand::List {
            page,
            size,
            sort,
            category,
            name,
        } => {
            let query = ProductQuery {
                page,
                size,
                sort: sort.parse::<ProductSort>()?,
                category,
                name,
            };
            let spinner = ctx.output.spinner("Fetching products...");
            let result = api.list(&query).await;
            spinner.finish_and_clear();
            let page = result.context("Failed to list products")?;

            if ctx.output.is_json() {
                ctx.output.json(&page);
                return Ok(());
            }
            ctx.output.header(&format!(
                "Products (page {} of {}, {} total)",
                page.number + 1,
                page.total_pages.max(1),
                page.total_elements
            ));
            print_table(&page.content, currency, ctx);
            if page.has_next() {
                ctx.output
                    .info(&format!("More results: --page {}", page.number + 1));
            }
        }
        ProductsCommand::Get { id } => {
            let spinner = ctx.output.spinner("Fetching product...");
            let result = api.get(&ProductId::new(id.clone())).await;
            spinner.finish_and_clear();
            let product = match result {
                Err(e) if e.is_not_found() => bail!("Product {} not found", id),
                other => other.with_context(|| format!("Failed to fetch product {}", id))?,
            };
            print_product(&product, currency, ctx);
        }
        ProductsCommand::LowStock { threshold } => {
            auth.require_admin()
                .context("Stock reports require an admin account")?;
            let spinner = ctx.output.spinner("Fetching stock levels...");
            let result = api.low_stock(threshold).await;
            spinner.finish_and_clear();
            let products = result.context("Failed to fetch low-stock products")?;

            if ctx.output.is_json() {
                ctx.output.json(&products);
                return Ok(());
            }
            ctx.output
                .header(&format!("Stock at or below {}", threshold));
            if products.is_empty() {
                ctx.output.info("Nothing is running low");
                return Ok(());
            }
            print_table(&products, currency, ctx);
        }
        ProductsCommand::Categories => {
            let categories = ctx
                .categories()
                .all()
                .await
                .context("Failed to list categories")?;

            if ctx.output.is_json() {
                ctx.output.json(&categories);
                return Ok(());
            }
            ctx.output.header("Categories");
            let widths = [8, 20, 40];
            ctx.output.table_row(&["ID", "NAME", "DESCRIPTION"], &widths);
            for category in &categories {
                ctx.output.table_row(
                    &[
                        category.id.as_str(),
                        &category.name,
                        category.description.as_deref().unwrap_or(""),
                    ],
                    &widths,
                );
            }
        }
    }

    Ok(())
}

fn print_table(products: &[Product], currency: Currency, ctx: &Context) {
    let widths = [8, 28, 12, 8];
    ctx.output.table_row(&["ID", "NAME", "PRICE", "STOCK"], &widths);
    for product in products {
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.name,
                &product.snapshot(currency).unit_price.display(),
                &product.stock_quantity.to_string(),
            ],
            &widths,
        );
    }
}

fn print_product(product: &Product, currency: Currency, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(product);
        return;
    }

    let snapshot = product.snapshot(currency);
    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("Price", &snapshot.unit_price.display());
    if !snapshot.discount.is_zero() {
        ctx.output.kv("Discount", &snapshot.discount.display());
    }
    if let Some(category) = &product.category {
        ctx.output.kv("Category", &category.name);
    }
    ctx.output.kv(
        "Stock",
        &if product.in_stock() {
            product.stock_quantity.to_string()
        } else {
            "out of stock".to_string()
        },
    );
    if let Some(description) = &product.description {
        println!("\n{}", description);
    }
}
