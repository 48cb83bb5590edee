//! CLI command implementations.

pub mod catalog;
pub mod config;
pub mod init;
pub mod run;
pub mod shell;

use clap::{Args, Subcommand};

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Shop name written to the config (default: directory name).
    #[arg(short, long)]
    pub name: Option<String>,

    /// Overwrite existing files.
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Session script (TOML or JSON).
    pub script: String,

    /// Stop at the first operation that returns an error.
    #[arg(long)]
    pub stop_on_error: bool,
}

/// Arguments for the shell command.
#[derive(Args)]
pub struct ShellArgs {
    /// User to act as initially.
    #[arg(short, long, default_value = "user1")]
    pub user: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
