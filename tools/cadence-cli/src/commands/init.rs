//! Initialize a shop directory.

use anyhow::{bail, Context as _, Result};

use super::InitArgs;
use crate::config::generate_default_config;
use crate::context::Context;
use crate::session::generate_sample_session;

/// Run the init command.
pub async fn run(args: InitArgs, ctx: &Context) -> Result<()> {
    let name = args.name.clone().unwrap_or_else(|| {
        ctx.cwd
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("cadence")
            .to_string()
    });

    ctx.output.header(&format!("Initializing shop: {}", name));

    let config_path = ctx.cwd.join("cadence.toml");
    let session_path = ctx.cwd.join("session.toml");

    for path in [&config_path, &session_path] {
        if path.exists() && !args.force {
            bail!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            );
        }
    }

    ctx.output.step(1, 2, "Creating cadence.toml");
    std::fs::write(&config_path, generate_default_config(&name))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output.step(2, 2, "Creating session.toml");
    std::fs::write(&session_path, generate_sample_session())
        .with_context(|| format!("Failed to write {}", session_path.display()))?;

    ctx.output.success(&format!("Shop '{}' initialized", name));
    ctx.output.info("");
    ctx.output.info("Next steps:");
    ctx.output.list_item("cadence catalog");
    ctx.output.list_item("cadence run session.toml");
    ctx.output.list_item("cadence shell");

    Ok(())
}
