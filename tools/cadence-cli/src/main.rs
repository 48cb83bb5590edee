//! Cadence CLI - drive an in-memory Cadence shop from the command line.
//!
//! Commands:
//! - `cadence init` - Write a default config and a sample session script
//! - `cadence catalog` - List catalog items
//! - `cadence run` - Replay a session script against a fresh shop
//! - `cadence shell` - Interactive shop prompt
//! - `cadence config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;
mod session;

use anyhow::Result;
use cadence_observability::{LogFormat, LogLevel};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, InitArgs, RunArgs, ShellArgs};

/// Cadence - order and discount-cadence shop simulator
#[derive(Parser)]
#[command(name = "cadence")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write cadence.toml and a sample session.toml
    Init(InitArgs),

    /// List catalog items
    Catalog,

    /// Replay a session script against a fresh shop
    Run(RunArgs),

    /// Interactive shop prompt
    Shell(ShellArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let mut ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if cli.verbose {
        ctx.config.logging.level = LogLevel::Debug;
    }
    init_tracing(ctx.config.logging.level, ctx.config.logging.format);
    if let Some(ref path) = ctx.config_path {
        ctx.output
            .debug(&format!("Using config: {}", path.display()));
    }

    // Execute command
    let result = match cli.command {
        Commands::Init(args) => commands::init::run(args, &ctx).await,
        Commands::Catalog => commands::catalog::run(&ctx).await,
        Commands::Run(args) => commands::run::run(args, &ctx).await,
        Commands::Shell(args) => commands::shell::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Install the stderr tracing subscriber. `RUST_LOG` overrides the config level.
fn init_tracing(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,cadence_commerce={level},cadence_cli={level}",
            level = level.as_str()
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Human => builder.try_init(),
    };
}
