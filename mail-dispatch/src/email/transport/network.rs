//! SMTP relay transport
//!
//! Uses the `lettre` crate to talk to the configured relay. The pooled
//! client needs a running Tokio runtime, so it is created on the first
//! delivery and reused afterwards. Construction only checks the port.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment as LettreAttachment, Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::fmt;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::Transporter;
use crate::config::MailConfig;
use crate::email::{DeliveryReceipt, OutboundMessage, Recipients};
use crate::error::MailError;

/// Relay credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Auth {
    /// SMTP username
    pub user: String,

    /// SMTP password
    pub pass: String,
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// Parameters the SMTP client is created from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportParams {
    /// Relay host
    pub host: String,

    /// Relay port, as configured
    pub port: String,

    /// Implicit TLS on connect; always `false`, STARTTLS is used when offered
    pub secure: bool,

    /// Credentials, present only when both username and password are set
    pub auth: Option<Auth>,
}

impl TransportParams {
    /// Derive transport parameters from configuration
    #[must_use]
    pub fn from_config(config: &MailConfig) -> Self {
        let auth = config.credentials().map(|(user, pass)| Auth {
            user: user.to_string(),
            pass: pass.to_string(),
        });

        Self {
            host: config.host.clone(),
            port: config.effective_port().to_string(),
            secure: false,
            auth,
        }
    }
}

/// Transporter that relays through an SMTP server
pub struct NetworkTransport {
    params: TransportParams,
    port: Result<u16, String>,
    client: OnceCell<AsyncSmtpTransport<Tokio1Executor>>,
}

impl NetworkTransport {
    /// Create a transport for the given parameters
    ///
    /// Never fails and needs no runtime: the port is checked here, the SMTP
    /// client is created on the first [`Transporter::deliver`], and any
    /// problem with either is reported there.
    #[must_use]
    pub fn new(params: TransportParams) -> Self {
        let port = params.port.parse::<u16>().map_err(|_| {
            format!(
                "SMTP port must be a valid port number, got {:?}",
                params.port
            )
        });
        if let Err(error) = &port {
            warn!(host = %params.host, %error, "SMTP transport is misconfigured");
        }

        Self {
            params,
            port,
            client: OnceCell::new(),
        }
    }

    /// Parameters this transport was created from
    #[must_use]
    pub const fn params(&self) -> &TransportParams {
        &self.params
    }

    async fn client(&self) -> Result<&AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let port = *self
            .port
            .as_ref()
            .map_err(|error| {
                MailError::config(format!("SMTP transport could not be created: {error}"))
            })?;

        self.client
            .get_or_try_init(|| async { Self::create_client(&self.params, port) })
            .await
    }

    fn create_client(
        params: &TransportParams,
        port: u16,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let tls_parameters = TlsParameters::new(params.host.clone()).map_err(|e| {
            MailError::config(format!(
                "SMTP transport could not be created: TLS parameters error: {e}"
            ))
        })?;
        let tls = if params.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&params.host)
            .port(port)
            .tls(tls);

        if let Some(auth) = &params.auth {
            builder = builder.credentials(Credentials::new(auth.user.clone(), auth.pass.clone()));
        }

        debug!(host = %params.host, port, "SMTP client created");
        Ok(builder.build())
    }

    /// Build a lettre message, returning it with its Message-ID
    fn build_message(message: &OutboundMessage) -> Result<(Message, String), MailError> {
        let from = parse_mailbox(&message.from)?;
        let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

        let mut builder = Message::builder()
            .from(from)
            .subject(message.subject.as_str())
            .message_id(Some(message_id.clone()));

        for address in message.to.iter() {
            builder = builder.to(parse_mailbox(address)?);
        }

        for address in message.bcc.iter().flat_map(Recipients::iter) {
            builder = builder.bcc(parse_mailbox(address)?);
        }

        if let Some(reply_to) = &message.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to)?);
        }

        let body = MultiPart::alternative_plain_html(message.text.clone(), message.html.clone());

        let body = if message.attachments.is_empty() {
            body
        } else {
            let mut mixed = MultiPart::mixed().multipart(body);
            for attachment in &message.attachments {
                let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                    MailError::transport(format!(
                        "invalid content type {:?} for attachment {}: {e}",
                        attachment.content_type, attachment.filename
                    ))
                })?;
                mixed = mixed.singlepart(
                    LettreAttachment::new(attachment.filename.clone())
                        .body(attachment.content.clone(), content_type),
                );
            }
            mixed
        };

        let email = builder
            .multipart(body)
            .map_err(|e| MailError::transport(format!("failed to build message: {e}")))?;

        Ok((email, message_id))
    }
}

impl fmt::Debug for NetworkTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkTransport")
            .field("params", &self.params)
            .field("port_valid", &self.port.is_ok())
            .field("client_created", &self.client.initialized())
            .finish()
    }
}

#[async_trait]
impl Transporter for NetworkTransport {
    async fn deliver(&self, message: OutboundMessage) -> Result<DeliveryReceipt, MailError> {
        let client = self.client().await?;

        let (email, message_id) = Self::build_message(&message)?;
        let accepted = email
            .envelope()
            .to()
            .iter()
            .map(ToString::to_string)
            .collect();

        let response = client.send(email).await.map_err(|e| {
            warn!(host = %self.params.host, error = %e, "SMTP delivery failed");
            MailError::transport(e.to_string())
        })?;

        let response = format!(
            "{} {}",
            response.code(),
            response
                .message()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        );

        info!(
            host = %self.params.host,
            message_id = %message_id,
            "Email relayed"
        );

        Ok(DeliveryReceipt {
            accepted,
            rejected: Vec::new(),
            pending: Vec::new(),
            message_id,
            response,
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::{Attachment, SendMailRequest};

    fn params(port: &str) -> TransportParams {
        TransportParams {
            host: "smtp.example.com".to_string(),
            port: port.to_string(),
            secure: false,
            auth: None,
        }
    }

    fn outbound(request: SendMailRequest) -> OutboundMessage {
        OutboundMessage::compose("\"Acme\" <no-reply@acme.com>", request)
    }

    #[test]
    fn test_params_from_config() {
        let config = MailConfig::new("a@b.com", "B", "smtp.example.com")
            .with_credentials("u", "p");
        let params = TransportParams::from_config(&config);

        assert_eq!(params.port, "25");
        assert!(!params.secure);
        assert_eq!(params.auth.as_ref().map(|a| a.user.as_str()), Some("u"));
        assert_eq!(params.auth.as_ref().map(|a| a.pass.as_str()), Some("p"));
    }

    #[test]
    fn test_auth_debug_redacts_password() {
        let auth = Auth {
            user: "u".to_string(),
            pass: "hunter2".to_string(),
        };
        assert!(!format!("{auth:?}").contains("hunter2"));
    }

    #[test]
    fn test_build_message_simple() {
        let (email, message_id) = NetworkTransport::build_message(&outbound(
            SendMailRequest::new("user@example.com", "Hi", "<p>hey</p>"),
        ))
        .unwrap();

        assert!(message_id.starts_with('<'));
        assert!(message_id.ends_with("@acme.com>"));

        let formatted = String::from_utf8(email.formatted()).unwrap();
        assert!(formatted.contains("Subject: Hi"));
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains(&message_id));
    }

    #[test]
    fn test_build_message_with_bcc_reply_to_and_attachment() {
        let request = SendMailRequest::new(
            ["a@example.com", "b@example.com"],
            "Report",
            "<p>See attached</p>",
        )
        .bcc("audit@example.com")
        .reply_to("support@acme.com")
        .attachment(Attachment::new("report.txt", "text/plain", b"numbers".to_vec()));

        let (email, _) = NetworkTransport::build_message(&outbound(request)).unwrap();

        let recipients: Vec<String> = email
            .envelope()
            .to()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(recipients.len(), 3);
        assert!(recipients.contains(&"audit@example.com".to_string()));

        let formatted = String::from_utf8(email.formatted()).unwrap();
        assert!(formatted.contains("Reply-To: support@acme.com"));
        assert!(formatted.contains("multipart/mixed"));
        assert!(formatted.contains("report.txt"));
    }

    #[test]
    fn test_build_message_rejects_unparseable_address() {
        let request = SendMailRequest::new("not an address", "Hi", "x");
        let result = NetworkTransport::build_message(&outbound(request));
        assert!(matches!(result, Err(MailError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_invalid_port_surfaces_on_first_delivery() {
        let transport = NetworkTransport::new(params("not-a-port"));

        let result = transport
            .deliver(outbound(SendMailRequest::new(
                "user@example.com",
                "Hi",
                "<p>hey</p>",
            )))
            .await;

        assert!(matches!(result, Err(MailError::Configuration(_))));
    }

    #[test]
    fn test_new_needs_no_runtime() {
        let transport = NetworkTransport::new(params("587"));

        let debug = format!("{transport:?}");
        assert!(debug.contains("port_valid: true"));
        assert!(debug.contains("client_created: false"));
    }

    #[test]
    fn test_new_with_invalid_port_needs_no_runtime() {
        let transport = NetworkTransport::new(params("not-a-port"));
        assert!(format!("{transport:?}").contains("port_valid: false"));
    }

    #[tokio::test]
    async fn test_client_is_created_once_without_connecting() {
        let transport = NetworkTransport::new(params("587"));

        let first = transport.client().await.unwrap();
        let second = transport.client().await.unwrap();

        assert!(std::ptr::eq(first, second));
        assert!(format!("{transport:?}").contains("client_created: true"));
    }
}
