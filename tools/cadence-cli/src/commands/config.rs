//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use cadence_commerce::Currency;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    let shop = &ctx.config.shop;
    ctx.output.info("");
    ctx.output.info("[shop]");
    ctx.output.kv("name", &shop.name);
    ctx.output.kv("nth_order", &shop.nth_order.to_string());
    ctx.output.kv("discount_percent", &shop.discount_percent.to_string());
    ctx.output.kv("code_prefix", &shop.code_prefix);
    ctx.output.kv("currency", shop.currency.code());
    ctx.output.kv(
        "max_quantity_per_item",
        &shop.max_quantity_per_item.to_string(),
    );

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", ctx.config.logging.level.as_str());
    ctx.output.kv("format", ctx.config.logging.format.as_str());

    ctx.output.info("");
    if ctx.config.catalog.is_empty() {
        ctx.output.info("Catalog: built-in items");
    } else {
        ctx.output.info("[[catalog]]");
        for entry in &ctx.config.catalog {
            ctx.output
                .list_item(&format!("{} {} ({:.2})", entry.item_id, entry.name, entry.price));
        }
    }

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(ref config_path) = ctx.config_path else {
        bail!("No config file found. Run `cadence config init` to create one.");
    };

    // Reload so unrelated sections are written back unchanged.
    let mut config = CliConfig::load(config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("cadence.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let name = ctx
        .cwd
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("cadence")
        .to_string();

    fs::write(&config_path, generate_default_config(&name))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Collect configuration errors and warnings.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = config.shop.validate() {
        errors.push(format!("shop: {}", e));
    }

    for (i, entry) in config.catalog.iter().enumerate() {
        if entry.item_id.trim().is_empty() {
            errors.push(format!("catalog[{}].item_id is required", i));
        }
        if entry.name.trim().is_empty() {
            warnings.push(format!("catalog[{}].name is empty", i));
        }
    }

    if let Err(e) = config.build_catalog() {
        errors.push(format!("{:#}", e));
    }

    if config.shop.discount_percent == 100 {
        warnings.push("shop.discount_percent = 100 makes discounted orders free".to_string());
    }

    if config.catalog.is_empty() {
        warnings.push("no [[catalog]] entries; the built-in items will be used".to_string());
    }

    (errors, warnings)
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["shop", "name"] => Ok(format!("\"{}\"", config.shop.name)),
        ["shop", "nth_order"] => Ok(config.shop.nth_order.to_string()),
        ["shop", "discount_percent"] => Ok(config.shop.discount_percent.to_string()),
        ["shop", "code_prefix"] => Ok(format!("\"{}\"", config.shop.code_prefix)),
        ["shop", "currency"] => Ok(format!("\"{}\"", config.shop.currency.code())),
        ["shop", "max_quantity_per_item"] => Ok(config.shop.max_quantity_per_item.to_string()),
        ["logging", "level"] => Ok(format!("\"{}\"", config.logging.level.as_str())),
        ["logging", "format"] => Ok(format!("\"{}\"", config.logging.format.as_str())),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["shop", "name"] => config.shop.name = value.to_string(),
        ["shop", "nth_order"] => config.shop.nth_order = value.parse()?,
        ["shop", "discount_percent"] => config.shop.discount_percent = value.parse()?,
        ["shop", "code_prefix"] => config.shop.code_prefix = value.to_string(),
        ["shop", "currency"] => {
            config.shop.currency = match Currency::from_code(value) {
                Some(c) => c,
                None => bail!("Unknown currency: {}", value),
            }
        }
        ["shop", "max_quantity_per_item"] => config.shop.max_quantity_per_item = value.parse()?,
        ["logging", "level"] => config.logging.level = value.parse()?,
        ["logging", "format"] => config.logging.format = value.parse()?,
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}
