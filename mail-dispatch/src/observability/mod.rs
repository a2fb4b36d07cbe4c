//! Logging setup
//!
//! The dispatcher reports through `tracing`; this module installs a
//! subscriber for binaries that do not bring their own.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{MailError, Result};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to the startup event
    pub service_name: String,

    /// Output format
    pub format: LogFormat,

    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let (format, default_filter) = if cfg!(debug_assertions) {
            (LogFormat::Pretty, "info,mail_dispatch=debug")
        } else {
            (LogFormat::Json, "info")
        };

        Self {
            service_name: "mail-dispatch".to_string(),
            format,
            default_filter: default_filter.to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Create new observability config
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Emit JSON instead of pretty output
    #[must_use]
    pub fn with_json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    /// Use a different default filter
    #[must_use]
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }
}

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over the configured default filter.
///
/// # Errors
///
/// Returns `MailError::Configuration` if a global subscriber is already set.
///
/// # Example
///
/// ```rust,no_run
/// use mail_dispatch::observability::{self, ObservabilityConfig};
///
/// # fn main() -> Result<(), mail_dispatch::error::MailError> {
/// observability::init(&ObservabilityConfig::new("mailer"))?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };
    result.map_err(|e| MailError::config(format!("failed to initialize logging: {e}")))?;

    tracing::debug!(service = %config.service_name, "Logging initialized");
    Ok(())
}
