//! Account profile commands.

use anyhow::{bail, Context as _, Result};
use shopkit_auth::{Address, ProfileUpdate, User};

use super::{ProfileArgs, ProfileCommand};
use crate::context::Context;

/// Run the profile command.
pub async fn run(args: ProfileArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let auth = ctx.auth(&store);
    let signed_in = auth
        .require_user()
        .context("Run `shopkit login` first")?;
    let api = ctx.users(&auth);

    let update = match args.command.unwrap_or(ProfileCommand::Show) {
        ProfileCommand::Show => {
            let spinner = ctx.output.spinner("Fetching profile...");
            let result = api.get(&signed_in.id).await;
            spinner.finish_and_clear();
            let user = result.context("Failed to fetch profile")?;
            auth.set_user(user.clone());
            print_profile(&user, ctx);
            return Ok(());
        }
        ProfileCommand::Update { email, phone } => ProfileUpdate {
            email,
            phone_number: phone,
            ..ProfileUpdate::default()
        },
        ProfileCommand::SetAddress {
            street,
            city,
            state,
            postal_code,
            country,
            billing,
        } => {
            let address = Address::new(street, city, state, postal_code, country);
            if billing {
                ProfileUpdate {
                    billing_address: Some(address),
                    ..ProfileUpdate::default()
                }
            } else {
                ProfileUpdate {
                    shipping_address: Some(address),
                    ..ProfileUpdate::default()
                }
            }
        }
    };

    if update.is_empty() {
        bail!("Nothing to update");
    }
    let spinner = ctx.output.spinner("Saving profile...");
    let result = api.update(&signed_in.id, &update).await;
    spinner.finish_and_clear();
    let user = result.context("Failed to update profile")?;
    auth.set_user(user.clone());

    if ctx.output.is_json() {
        ctx.output.json(&user);
        return Ok(());
    }
    ctx.output.success("Profile updated");
    print_profile(&user, ctx);
    Ok(())
}

fn print_profile(user: &User, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(user);
        return;
    }

    ctx.output.header(user.display_name());
    ctx.output.kv("Email", &user.email);
    ctx.output
        .kv("Phone", user.phone_number.as_deref().unwrap_or("-"));
    let shipping = user.shipping_address.as_ref().map(Address::one_line);
    ctx.output
        .kv("Shipping", shipping.as_deref().unwrap_or("-"));
    let billing = user.billing_address.as_ref().map(Address::one_line);
    ctx.output.kv("Billing", billing.as_deref().unwrap_or("-"));
}
