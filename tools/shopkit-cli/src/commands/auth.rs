//! Sign-in commands.

use anyhow::{Context as _, Result};
use dialoguer::{Input, Password};
use shopkit_auth::AuthError;

use super::LoginArgs;
use crate::context::Context;

/// Run the login command.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match args.password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let store = ctx.store()?;
    let auth = ctx.auth(&store);

    let spinner = ctx.output.spinner("Signing in...");
    let result = auth.login(&email, &password).await;
    spinner.finish_and_clear();

    let user = match result {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => anyhow::bail!("Email or password is incorrect"),
        Err(e) => return Err(e).context("Sign-in failed"),
    };

    if ctx.output.is_json() {
        ctx.output.json(&user);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Signed in as {} ({})",
        user.display_name(),
        user.role.as_str()
    ));
    Ok(())
}

/// Run the logout command.
pub async fn logout(ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    ctx.auth(&store).logout();
    ctx.output.success("Signed out");
    Ok(())
}

/// Run the whoami command.
pub async fn whoami(ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let auth = ctx.auth(&store);

    let user = match (auth.is_authenticated(), auth.user()) {
        (true, Some(user)) => user,
        _ => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::Value::Null);
            } else {
                ctx.output.info("Not signed in");
            }
            return Ok(());
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&user);
        return Ok(());
    }
    ctx.output.header("Signed in");
    ctx.output.kv("User", &user.username);
    ctx.output.kv("Email", &user.email);
    if let Some(phone) = &user.phone_number {
        ctx.output.kv("Phone", phone);
    }
    ctx.output.kv("Role", user.role.as_str());
    Ok(())
}
