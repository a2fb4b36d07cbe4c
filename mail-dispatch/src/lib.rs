//! mail-dispatch: outbound mail with a relay-or-echo transport
//!
//! A [`MailDispatcher`](email::MailDispatcher) is built once from a
//! [`MailConfig`](config::MailConfig). At construction it selects one of two
//! transports and keeps it for its whole lifetime:
//!
//! - **Network**: an SMTP relay reached through `lettre`, used whenever
//!   `host` is non-empty
//! - **Echo**: logs the message and fabricates a success receipt, used when
//!   `host` is empty (local development, tests)
//!
//! Every send derives a plain-text body from the HTML content, hands the
//! normalized message to the transport and returns the message id.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mail_dispatch::prelude::*;
//!
//! # async fn example() -> Result<(), MailError> {
//! let config = MailConfig::load()?;
//! let dispatcher = MailDispatcher::new(config)?;
//!
//! let message_id = dispatcher
//!     .send_mail(
//!         SendMailRequest::new("user@example.com", "Welcome!", "<h1>Hello</h1>")
//!             .reply_to("support@example.com"),
//!     )
//!     .await?;
//!
//! tracing::info!(%message_id, "welcome mail dispatched");
//! # Ok(())
//! # }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod email;
pub mod error;
pub mod observability;
pub mod testing;

/// Commonly used types
pub mod prelude {
    pub use crate::config::MailConfig;
    pub use crate::email::{
        Attachment, DeliveryReceipt, DispatcherState, MailDispatcher, MailObserver,
        OutboundMessage, Recipients, SendMailRequest, TracingObserver, TransportKind,
        Transporter,
    };
    pub use crate::error::{MailError, Result};
}
