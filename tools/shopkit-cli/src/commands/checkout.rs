//! Checkout command.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use shopkit_commerce::CheckoutError;

use super::CheckoutArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let auth = ctx.auth(&store);
    let cart = ctx.cart(&store, &auth);

    let request = match cart.preview_checkout() {
        Ok(request) => request,
        Err(CheckoutError::EmptyCart) => {
            anyhow::bail!("Cart is empty. Add items with `shopkit cart add` first.")
        }
        Err(e) => return Err(e.into()),
    };

    if args.dry_run {
        ctx.output.json(&request);
        return Ok(());
    }

    if !auth.is_authenticated() {
        ctx.output
            .warn("Not signed in; the order will be placed without a customer email.");
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Place order for {} item(s), total {:.2}?",
                cart.item_count(),
                request.total_amount
            ))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Placing order...");
    let result = cart.checkout().await;
    spinner.finish_and_clear();

    let order = result.context("Checkout failed; the cart was left unchanged")?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.success(&format!("Order {} placed", order.id));
    ctx.output.kv("Status", &status_badge(order.status));
    ctx.output.kv("Total", &format!("{:.2}", order.total_amount));
    if let Some(email) = &order.customer_email {
        ctx.output.kv("Confirmation to", email);
    }
    Ok(())
}
