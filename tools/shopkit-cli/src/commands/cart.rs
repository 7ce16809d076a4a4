//! Cart commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use shopkit_commerce::cart::{CartSessionManager, QuantityChange};
use shopkit_commerce::ProductId;

use super::{CartArgs, CartCommand};
use crate::context::{Context, Store};
use crate::output::format_millis;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let auth = ctx.auth(&store);
    let cart = ctx.cart(&store, &auth);

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show(&cart, ctx),
        CartCommand::Add {
            product_id,
            quantity,
        } => {
            let id = ProductId::new(product_id);
            let spinner = ctx.output.spinner("Fetching product...");
            let result = ctx.products(&auth).get(&id).await;
            spinner.finish_and_clear();
            let product = match result {
                Err(e) if e.is_not_found() => bail!("Product {} not found", id),
                other => other.with_context(|| format!("Failed to fetch product {}", id))?,
            };

            if quantity <= 0 {
                ctx.output
                    .info(&format!("Nothing added: quantity {} for {}", quantity, product.name));
                return show(&cart, ctx);
            }
            if !product.in_stock() {
                ctx.output.warn(&format!("{} is out of stock", product.name));
            }
            cart.add_item(product.snapshot(cart.currency()), quantity)?;
            ctx.output
                .success(&format!("Added {} x {}", quantity, product.name));
            show(&cart, ctx)
        }
        CartCommand::Set {
            product_id,
            quantity,
        } => {
            let id = ProductId::new(product_id);
            match cart.set_quantity(&id, quantity) {
                QuantityChange::Updated { previous, current } => ctx
                    .output
                    .success(&format!("{}: {} -> {}", id, previous, current)),
                QuantityChange::Removed => ctx.output.success(&format!("Removed {}", id)),
                QuantityChange::Missing => bail!("Product {} is not in the cart", id),
            }
            show(&cart, ctx)
        }
        CartCommand::Remove { product_id } => {
            let id = ProductId::new(product_id);
            if !cart.remove_item(&id) {
                ctx.output.warn(&format!("Product {} is not in the cart", id));
                return Ok(());
            }
            ctx.output.success(&format!("Removed {}", id));
            show(&cart, ctx)
        }
        CartCommand::Clear { yes } => {
            if cart.is_empty() {
                ctx.output.info("Cart is already empty");
                return Ok(());
            }
            if !yes && !ctx.output.is_json() {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove all {} item(s) from the cart?", cart.item_count()))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.info("Cancelled");
                    return Ok(());
                }
            }
            if cart.clear() {
                ctx.output.success("Cart cleared");
            }
            Ok(())
        }
    }
}

/// Print the cart.
pub fn show(cart: &CartSessionManager<Store>, ctx: &Context) -> Result<()> {
    let lines = cart.lines();
    let total = cart.total()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "lines": lines,
            "itemCount": cart.item_count(),
            "total": total.to_decimal(),
            "currency": total.currency,
            "expiresAt": cart.expires_at(),
        }));
        return Ok(());
    }

    ctx.output.header("Cart");
    if lines.is_empty() {
        ctx.output.info("Cart is empty");
        return Ok(());
    }

    let widths = [10, 28, 6, 12];
    ctx.output.table_row(&["ID", "PRODUCT", "QTY", "SUBTOTAL"], &widths);
    for line in &lines {
        let subtotal = line
            .line_total()
            .map(|m| m.display())
            .unwrap_or_else(|| "overflow".to_string());
        ctx.output.table_row(
            &[
                line.product.id.as_str(),
                &line.product.name,
                &line.quantity.to_string(),
                &subtotal,
            ],
            &widths,
        );
    }
    println!();
    ctx.output.kv("Items", &cart.item_count().to_string());
    ctx.output.kv("Total", &total.display());
    if let Some(expires_at) = cart.expires_at() {
        ctx.output.kv("Expires", &format_millis(expires_at));
    }
    Ok(())
}
