//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Init { base_url, force } => init_config(&base_url, force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    println!("\n[api]");
    ctx.output.kv("base_url", &ctx.config.api.base_url);
    ctx.output.kv("timeout_ms", &ctx.config.api.timeout_ms.to_string());

    println!("\n[cart]");
    ctx.output.kv("storage_key", &ctx.config.cart.storage_key);
    ctx.output.kv("ttl_secs", &ctx.config.cart.ttl_secs.to_string());
    ctx.output.kv("currency", ctx.config.cart.currency.code());

    println!("\n[storage]");
    ctx.output.kv(
        "path",
        &ctx.resolve_path(&ctx.config.state_path()).display().to_string(),
    );

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn init_config(base_url: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let content = generate_default_config(base_url);
    // Refuse to write something that would not load back.
    toml::from_str::<CliConfig>(&content)?;
    fs::write(&config_path, content)?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "base_url"] => Ok(config.api.base_url.clone()),
        ["api", "timeout_ms"] => Ok(config.api.timeout_ms.to_string()),
        ["cart", "storage_key"] => Ok(config.cart.storage_key.clone()),
        ["cart", "ttl_secs"] => Ok(config.cart.ttl_secs.to_string()),
        ["cart", "currency"] => Ok(config.cart.currency.code().to_string()),
        ["storage", "path"] => Ok(config.state_path().display().to_string()),
        _ => bail!("Unknown config key: {}", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value() {
        let config = CliConfig::default();
        assert_eq!(
            get_config_value(&config, "cart.storage_key").unwrap(),
            "app_cart_v1"
        );
        assert_eq!(get_config_value(&config, "cart.currency").unwrap(), "USD");
        assert!(get_config_value(&config, "cart.nope").is_err());
    }
}
