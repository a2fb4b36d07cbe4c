//! Echo transport for development
//!
//! Logs messages instead of sending them and reports every recipient as
//! accepted. Useful where no mail infrastructure exists.

use async_trait::async_trait;
use tracing::debug;

use super::Transporter;
use crate::email::{DeliveryReceipt, OutboundMessage};
use crate::error::MailError;

/// Transporter that never touches the network
///
/// # Examples
///
/// ```rust
/// use mail_dispatch::email::{EchoTransport, OutboundMessage, SendMailRequest, Transporter};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = EchoTransport::new();
/// let message = OutboundMessage::compose(
///     "\"Acme\" <no-reply@acme.com>",
///     SendMailRequest::new("user@example.com", "Hello!", "<p>Hello</p>"),
/// );
///
/// let receipt = transport.deliver(message).await?;
/// assert_eq!(receipt.message_id, "0");
/// assert_eq!(receipt.accepted, vec!["user@example.com"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoTransport;

impl EchoTransport {
    /// Create a new echo transport
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transporter for EchoTransport {
    async fn deliver(&self, message: OutboundMessage) -> Result<DeliveryReceipt, MailError> {
        debug!(
            from = %message.from,
            to = %message.to,
            bcc = ?message.bcc.as_ref().map(ToString::to_string),
            reply_to = ?message.reply_to,
            subject = %message.subject,
            "Echo transport: message not delivered"
        );

        Ok(DeliveryReceipt::echo(message.to.to_list()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::SendMailRequest;

    fn message(request: SendMailRequest) -> OutboundMessage {
        OutboundMessage::compose("\"B\" <a@b.com>", request)
    }

    #[tokio::test]
    async fn test_single_recipient_is_wrapped() {
        let receipt = EchoTransport::new()
            .deliver(message(SendMailRequest::new("a@x.com", "Hi", "<p>hey</p>")))
            .await
            .unwrap();

        assert_eq!(receipt.accepted, vec!["a@x.com"]);
        assert_eq!(receipt.message_id, "0");
        assert_eq!(receipt.response, "Email sent by dummy service");
    }

    #[tokio::test]
    async fn test_recipient_list_passes_through() {
        let receipt = EchoTransport::new()
            .deliver(message(SendMailRequest::new(
                ["a@x.com", "b@x.com"],
                "Hi",
                "<p>hey</p>",
            )))
            .await
            .unwrap();

        assert_eq!(receipt.accepted, vec!["a@x.com", "b@x.com"]);
        assert!(receipt.rejected.is_empty());
        assert!(receipt.pending.is_empty());
    }

    #[tokio::test]
    async fn test_bcc_is_not_reported_as_accepted() {
        let receipt = EchoTransport::new()
            .deliver(message(
                SendMailRequest::new("a@x.com", "Hi", "<p>hey</p>").bcc("hidden@x.com"),
            ))
            .await
            .unwrap();

        assert_eq!(receipt.accepted, vec!["a@x.com"]);
    }
}
