//! Order lookup and admin commands.

use anyhow::{Context as _, Result};
use shopkit_commerce::checkout::{ListOrders, OrderStatus, PlacedOrder};
use shopkit_commerce::OrderId;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let auth = ctx.auth(&store);
    let api = ctx.orders(&auth);

    match args.command {
        OrdersCommand::Get { id } => {
            let spinner = ctx.output.spinner("Fetching order...");
            let result = api.get(&OrderId::new(id.clone())).await;
            spinner.finish_and_clear();

            let order = match result {
                Err(e) if e.is_not_found() => anyhow::bail!("Order {} not found", id),
                other => other.with_context(|| format!("Failed to fetch order {}", id))?,
            };
            print_order(&order, ctx);
        }
        OrdersCommand::List { page, size, status } => {
            auth.require_admin()
                .context("Listing orders requires an admin account")?;
            let status = status
                .map(|s| s.parse::<OrderStatus>())
                .transpose()?;

            let spinner = ctx.output.spinner("Fetching orders...");
            let result = api.list(&ListOrders { page, size, status }).await;
            spinner.finish_and_clear();
            let page = result.context("Failed to list orders")?;

            if ctx.output.is_json() {
                ctx.output.json(&page);
                return Ok(());
            }

            ctx.output.header(&format!(
                "Orders (page {} of {}, {} total)",
                page.number + 1,
                page.total_pages.max(1),
                page.total_elements
            ));
            let widths = [8, 12, 10, 26];
            ctx.output.table_row(&["ID", "STATUS", "TOTAL", "CUSTOMER"], &widths);
            for order in &page.content {
                ctx.output.table_row(
                    &[
                        order.id.as_str(),
                        order.status.as_str(),
                        &format!("{:.2}", order.total_amount),
                        order.customer_email.as_deref().unwrap_or("-"),
                    ],
                    &widths,
                );
            }
            if page.has_next() {
                ctx.output
                    .info(&format!("More results: --page {}", page.number + 1));
            }
        }
        OrdersCommand::SetStatus { id, status, force } => {
            auth.require_admin()
                .context("Updating orders requires an admin account")?;
            let status: OrderStatus = status.parse()?;
            let order_id = OrderId::new(id.clone());

            if !force {
                let current = api
                    .get(&order_id)
                    .await
                    .with_context(|| format!("Failed to fetch order {}", id))?;
                if !current.status.can_transition_to(status) {
                    anyhow::bail!(
                        "Order {} is {} and cannot move to {} (use --force to override)",
                        id,
                        current.status,
                        status
                    );
                }
            }

            let spinner = ctx.output.spinner("Updating order...");
            let result = api.update_status(&order_id, status).await;
            spinner.finish_and_clear();
            let order = result.with_context(|| format!("Failed to update order {}", id))?;

            if ctx.output.is_json() {
                ctx.output.json(&order);
                return Ok(());
            }
            ctx.output
                .success(&format!("Order {} is now {}", order.id, status_badge(order.status)));
        }
    }

    Ok(())
}

fn print_order(order: &PlacedOrder, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(order);
        return;
    }

    ctx.output.header(&format!("Order {}", order.id));
    ctx.output.kv("Status", &status_badge(order.status));
    ctx.output.kv("Total", &format!("{:.2}", order.total_amount));
    if let Some(date) = order.order_date {
        ctx.output
            .kv("Placed", &date.format("%Y-%m-%d %H:%M UTC").to_string());
    }
    if let Some(email) = &order.customer_email {
        ctx.output.kv("Customer", email);
    }
    if !order.order_items.is_empty() {
        println!();
        let widths = [28, 6, 10];
        ctx.output.table_row(&["ITEM", "QTY", "PRICE"], &widths);
        for item in &order.order_items {
            ctx.output.table_row(
                &[
                    &item.name,
                    &item.quantity.to_string(),
                    &format!("{:.2}", item.price),
                ],
                &widths,
            );
        }
    }
}
