//! Outbound email with relay and echo transports
//!
//! This module provides:
//! - [`MailDispatcher`]: composes messages and hands them to its transport
//! - Two transports selected from configuration: SMTP relay or echo
//! - HTML to plain-text conversion for the text part of every message
//! - An injectable [`MailObserver`] for pre-send and post-send records
//!
//! # Examples
//!
//! ## Local development without a relay
//!
//! ```rust
//! use mail_dispatch::config::MailConfig;
//! use mail_dispatch::email::{MailDispatcher, SendMailRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MailConfig::new("a@b.com", "B", "");
//! let dispatcher = MailDispatcher::new(config)?;
//!
//! let message_id = dispatcher
//!     .send_mail(SendMailRequest::new("c@d.com", "Hi", "<p>hey</p>"))
//!     .await?;
//! assert_eq!(message_id, "0");
//! # Ok(())
//! # }
//! ```
//!
//! ## Relaying through SMTP
//!
//! ```rust,no_run
//! use mail_dispatch::config::MailConfig;
//! use mail_dispatch::email::{MailDispatcher, SendMailRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MailConfig::new("no-reply@acme.com", "Acme", "smtp.acme.com")
//!     .with_port("587")
//!     .with_credentials("mailer", "secret");
//! let dispatcher = MailDispatcher::new(config)?;
//!
//! dispatcher
//!     .send_mail(SendMailRequest::new(["a@x.com", "b@x.com"], "Report", "<p>Done</p>"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod dispatcher;
mod message;
mod observer;
mod receipt;
mod text;
pub mod transport;

pub use dispatcher::{DispatcherState, MailDispatcher};
pub use message::{Attachment, OutboundMessage, Recipients, SendMailRequest};
pub use observer::{MailObserver, TracingObserver};
pub use receipt::{DeliveryReceipt, ECHO_MESSAGE_ID, ECHO_RESPONSE};
pub use text::html_to_text;
pub use transport::{EchoTransport, NetworkTransport, TransportKind, Transporter};
