mod commands;
mod render;
mod script;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "zonecal")]
#[command(about = "Run calendar commands across time zones")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.config/zonecal/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every command in a TOML script, in order
    Run {
        script: PathBuf,

        /// Stop at the first command that fails
        #[arg(long)]
        stop_on_error: bool,
    },
    /// Show where configuration lives and what it resolves to
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            script,
            stop_on_error,
        } => commands::run::run(cli.config.as_deref(), &script, stop_on_error),
        Commands::Config => commands::config::run(cli.config.as_deref()),
    }
}
