//! Transporters and transport selection
//!
//! A transporter delivers one normalized message and reports a receipt.
//! Two are built in:
//! - **Network**: relays through an SMTP server (production)
//! - **Echo**: logs the message and fabricates a receipt (development)
//!
//! [`select`] picks one from configuration. It runs once per dispatcher.

pub mod echo;
pub mod network;

use async_trait::async_trait;
use std::fmt;

use crate::config::MailConfig;
use crate::email::{DeliveryReceipt, OutboundMessage};
use crate::error::MailError;

pub use echo::EchoTransport;
pub use network::{Auth, NetworkTransport, TransportParams};

/// Delivers normalized messages
///
/// Implemented by both built-in transports and by anything passed to
/// [`MailDispatcher::with_transporter`](crate::email::MailDispatcher::with_transporter).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transporter: Send + Sync {
    /// Deliver a message
    ///
    /// # Errors
    ///
    /// Returns `MailError` if the transport cannot deliver the message.
    async fn deliver(&self, message: OutboundMessage) -> Result<DeliveryReceipt, MailError>;
}

/// Which transporter a dispatcher is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Logs instead of delivering
    Echo,
    /// SMTP relay
    Network,
    /// Supplied by the caller
    Custom,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Echo => f.write_str("echo"),
            Self::Network => f.write_str("network"),
            Self::Custom => f.write_str("custom"),
        }
    }
}

/// Transporter chosen from configuration
#[derive(Debug)]
pub enum SelectedTransport {
    /// No relay host configured
    Echo(EchoTransport),
    /// Relay host configured
    Network(NetworkTransport),
}

impl SelectedTransport {
    /// Kind of the selected transporter
    #[must_use]
    pub const fn kind(&self) -> TransportKind {
        match self {
            Self::Echo(_) => TransportKind::Echo,
            Self::Network(_) => TransportKind::Network,
        }
    }
}

#[async_trait]
impl Transporter for SelectedTransport {
    async fn deliver(&self, message: OutboundMessage) -> Result<DeliveryReceipt, MailError> {
        match self {
            Self::Echo(transport) => transport.deliver(message).await,
            Self::Network(transport) => transport.deliver(message).await,
        }
    }
}

/// Choose a transporter for the given configuration
///
/// An empty `host` selects the echo transport. Anything else selects the
/// network transport. Selection needs no async runtime: the SMTP client is
/// created, and the relay contacted, only on the first delivery.
#[must_use]
pub fn select(config: &MailConfig) -> SelectedTransport {
    if config.is_echo() {
        tracing::debug!("No SMTP host configured, using echo transport");
        return SelectedTransport::Echo(EchoTransport::new());
    }

    let params = TransportParams::from_config(config);
    tracing::debug!(
        host = %params.host,
        port = %params.port,
        authenticated = params.auth.is_some(),
        "Using network transport"
    );
    SelectedTransport::Network(NetworkTransport::new(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_host_selects_echo() {
        let config = MailConfig::new("a@b.com", "B", "").with_port("");
        let selected = select(&config);
        assert_eq!(selected.kind(), TransportKind::Echo);
    }

    #[test]
    fn test_host_selects_network_with_auth() {
        let config =
            MailConfig::new("a@b.com", "B", "smtp.example.com").with_credentials("u", "p");

        let SelectedTransport::Network(transport) = select(&config) else {
            panic!("expected network transport");
        };

        let params = transport.params();
        assert_eq!(params.host, "smtp.example.com");
        assert_eq!(params.port, "25");
        assert!(!params.secure);
        assert_eq!(
            params.auth,
            Some(Auth {
                user: "u".to_string(),
                pass: "p".to_string(),
            })
        );
    }

    #[test]
    fn test_host_without_credentials_has_no_auth() {
        let config = MailConfig::new("a@b.com", "B", "smtp.example.com")
            .with_port("587")
            .with_credentials("u", "");

        let SelectedTransport::Network(transport) = select(&config) else {
            panic!("expected network transport");
        };

        assert_eq!(transport.params().port, "587");
        assert_eq!(transport.params().auth, None);
    }

    #[test]
    fn test_transport_kind_display() {
        assert_eq!(TransportKind::Echo.to_string(), "echo");
        assert_eq!(TransportKind::Network.to_string(), "network");
        assert_eq!(TransportKind::Custom.to_string(), "custom");
    }
}
