//! Configuration check command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use mail_dispatch::config::MailConfig;
use mail_dispatch::email::transport;

use super::{load_config, INFO, SUCCESS};

/// Validate and print the resolved mail configuration
#[derive(Debug, Args)]
pub struct CheckConfigCommand {
    /// Configuration file (defaults to `mail.toml` plus `MAIL_*` variables)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl CheckConfigCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is invalid
    pub fn execute(&self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        config.validate().context("Invalid mail configuration")?;

        println!("\n{INFO} Mail configuration");
        println!("{}", "─".repeat(48));
        for (label, value) in summary(&config) {
            println!("  {:<12} {}", style(label).bold(), value);
        }
        println!();
        println!("{SUCCESS} {}", style("Configuration is valid").green());

        Ok(())
    }
}

/// Rows describing the configuration; the password is never shown
fn summary(config: &MailConfig) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Sender", config.sender_identity()),
        ("Transport", transport::select(config).kind().to_string()),
    ];

    if !config.is_echo() {
        rows.push(("Host", config.host.clone()));
        rows.push(("Port", config.effective_port().to_string()));
        rows.push((
            "Auth",
            config
                .credentials()
                .map_or_else(|| "none".to_string(), |(user, _)| format!("{user} / ********")),
        ));
    }

    rows
}
