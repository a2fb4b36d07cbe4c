//! Error types for mail dispatch

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = MailError> = std::result::Result<T, E>;

/// Errors that can occur while configuring a dispatcher or sending mail
#[derive(Debug, Error)]
pub enum MailError {
    /// The dispatcher or its transport is misconfigured
    ///
    /// Covers a dispatcher with no bound transporter, missing sender fields
    /// and transport clients that could not be created. Never retryable.
    #[error("email configuration error: {0}")]
    Configuration(String),

    /// The mail transport refused or failed the delivery
    #[error("email transport error: {0}")]
    Transport(String),

    /// The mail transport could not parse an address
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MailError {
    /// Create a configuration error from a string message
    #[must_use]
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a transport error from a string message
    #[must_use]
    pub fn transport<T: Into<String>>(msg: T) -> Self {
        Self::Transport(msg.into())
    }

    /// Whether a caller may reasonably try the same send again
    ///
    /// Only transport failures qualify; this crate never retries on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
