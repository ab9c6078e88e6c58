//! Command-line driver for the encounter engine.
//!
//! Loads a content directory, boots a runtime over it and replays scripted
//! sessions. Run with: `encounter-sim <command>`

mod commands;
mod script;
mod session;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Run};

/// Replays scripted encounter sessions
#[derive(Parser)]
#[command(name = "encounter-sim")]
#[command(about = "Encounter engine simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Load content and replay a script, printing every receipt
    Run(Run),

    /// Load content and install it into a scratch engine without playing
    Check(Check),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute().await,
        Command::Check(cmd) => cmd.execute().await,
    }
}
