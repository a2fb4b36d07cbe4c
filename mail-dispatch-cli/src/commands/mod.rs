//! CLI command implementations

pub mod check;
pub mod send;

pub use check::CheckConfigCommand;
pub use send::SendCommand;

use std::path::Path;

use anyhow::{Context, Result};
use console::Emoji;
use mail_dispatch::config::MailConfig;

static SUCCESS: Emoji = Emoji("✓", "√");
static INFO: Emoji = Emoji("ℹ", "i");

/// Load configuration from an explicit file, or from `mail.toml` and the
/// environment when no file is given
fn load_config(path: Option<&Path>) -> Result<MailConfig> {
    match path {
        Some(path) => MailConfig::load_from(path)
            .with_context(|| format!("Failed to load mail configuration from {}", path.display())),
        None => MailConfig::load().context("Failed to load mail configuration"),
    }
}
