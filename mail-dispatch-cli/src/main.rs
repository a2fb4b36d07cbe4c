//! mail-dispatch CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{CheckConfigCommand, SendCommand};
use mail_dispatch::observability::{self, ObservabilityConfig};

#[derive(Parser)]
#[command(name = "mail-dispatch")]
#[command(version)]
#[command(about = "Send HTML mail through an SMTP relay", long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single message
    Send(SendCommand),
    /// Validate and print the resolved mail configuration
    CheckConfig(CheckConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging =
        ObservabilityConfig::new("mail-dispatch-cli").with_default_filter("warn,mail_dispatch=info");
    if cli.json_logs {
        logging = logging.with_json();
    }
    observability::init(&logging)?;

    match cli.command {
        Commands::Send(cmd) => cmd.execute().await,
        Commands::CheckConfig(cmd) => cmd.execute(),
    }
}
