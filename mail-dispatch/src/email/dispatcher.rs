//! Mail dispatcher
//!
//! Owns the sender identity and exactly one transporter. The transporter is
//! selected once, when the dispatcher is bound, and shared read-only by
//! every send afterwards.

use std::sync::Arc;
use tracing::debug;

use super::transport::{self, TransportKind, Transporter};
use super::{MailObserver, OutboundMessage, SendMailRequest, TracingObserver};
use crate::config::MailConfig;
use crate::error::{MailError, Result};

/// Lifecycle state of a dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// No transporter selected yet; sends fail
    Unbound,
    /// Transporter selected; terminal
    Bound,
}

/// Composes messages and delivers them through the bound transporter
///
/// Cloning is cheap and clones share the transporter and observer.
/// Concurrent sends are independent and complete in whatever order their
/// I/O does.
///
/// # Examples
///
/// ```rust
/// use mail_dispatch::config::MailConfig;
/// use mail_dispatch::email::{MailDispatcher, TransportKind};
///
/// let dispatcher = MailDispatcher::new(MailConfig::new("no-reply@acme.com", "Acme", ""))?;
///
/// assert_eq!(dispatcher.sender(), "\"Acme\" <no-reply@acme.com>");
/// assert_eq!(dispatcher.transport_kind(), Some(TransportKind::Echo));
/// # Ok::<(), mail_dispatch::error::MailError>(())
/// ```
#[derive(Clone)]
pub struct MailDispatcher {
    sender: Arc<str>,
    config: Arc<MailConfig>,
    observer: Arc<dyn MailObserver>,
    transporter: Option<Arc<dyn Transporter>>,
    kind: Option<TransportKind>,
}

impl MailDispatcher {
    /// Create a dispatcher and select its transporter from `config`
    ///
    /// # Errors
    ///
    /// Returns `MailError::Configuration` if `email` or `from` is empty.
    pub fn new(config: MailConfig) -> Result<Self> {
        Ok(Self::unbound(config)?.bind())
    }

    /// Create a dispatcher without selecting a transporter
    ///
    /// Sends fail with `MailError::Configuration` until [`bind`](Self::bind)
    /// or [`with_transporter`](Self::with_transporter) is called.
    ///
    /// # Errors
    ///
    /// Returns `MailError::Configuration` if `email` or `from` is empty.
    pub fn unbound(config: MailConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            sender: config.sender_identity().into(),
            config: Arc::new(config),
            observer: Arc::new(TracingObserver),
            transporter: None,
            kind: None,
        })
    }

    /// Select the transporter from configuration
    ///
    /// Does nothing once bound: a dispatcher never re-selects.
    #[must_use]
    pub fn bind(mut self) -> Self {
        if self.transporter.is_none() {
            let selected = transport::select(&self.config);
            self.kind = Some(selected.kind());
            self.transporter = Some(Arc::new(selected));
        }
        self
    }

    /// Bind a caller-supplied transporter instead of selecting one
    ///
    /// Does nothing once bound.
    #[must_use]
    pub fn with_transporter(mut self, transporter: Arc<dyn Transporter>) -> Self {
        if self.transporter.is_none() {
            self.kind = Some(TransportKind::Custom);
            self.transporter = Some(transporter);
        }
        self
    }

    /// Replace the observability sink (default: [`TracingObserver`])
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn MailObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Sender identity used as the From of every message
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Configuration this dispatcher was created from
    #[must_use]
    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> DispatcherState {
        if self.transporter.is_some() {
            DispatcherState::Bound
        } else {
            DispatcherState::Unbound
        }
    }

    /// Kind of the bound transporter, if any
    #[must_use]
    pub const fn transport_kind(&self) -> Option<TransportKind> {
        self.kind
    }

    /// Normalize a request into the message handed to the transporter
    #[must_use]
    pub fn compose(&self, request: SendMailRequest) -> OutboundMessage {
        OutboundMessage::compose(&self.sender, request)
    }

    /// Send an email, returning the message id
    ///
    /// The echo transport always returns `"0"`; the network transport
    /// returns the Message-ID of the relayed message.
    ///
    /// # Errors
    ///
    /// - `MailError::Configuration` if no transporter is bound, or the
    ///   transport client could not be created
    /// - `MailError::Transport` or `MailError::InvalidAddress` if the
    ///   transport fails; these are passed through untouched
    pub async fn send_mail(&self, request: SendMailRequest) -> Result<String> {
        let transporter = self
            .transporter
            .as_ref()
            .ok_or_else(|| MailError::config("transporter not initialised"))?;

        let message = self.compose(request);
        self.observer.on_outgoing(&message);

        let receipt = transporter.deliver(message).await?;
        self.observer.on_receipt(&receipt);

        debug!(message_id = %receipt.message_id, "Email dispatched");
        Ok(receipt.message_id)
    }
}

impl std::fmt::Debug for MailDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailDispatcher")
            .field("sender", &self.sender)
            .field("state", &self.state())
            .field("transport", &self.kind)
            .finish_non_exhaustive()
    }
}
