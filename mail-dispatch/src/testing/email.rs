//! Recording observer and transport
//!
//! Both capture what passes through them in memory for assertions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::email::{DeliveryReceipt, MailObserver, OutboundMessage, Transporter};
use crate::error::MailError;

/// Observer that keeps every record it receives
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use mail_dispatch::config::MailConfig;
/// use mail_dispatch::email::{MailDispatcher, SendMailRequest};
/// use mail_dispatch::testing::RecordingObserver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let observer = Arc::new(RecordingObserver::new());
/// let dispatcher = MailDispatcher::new(MailConfig::new("a@b.com", "B", ""))?
///     .with_observer(observer.clone());
///
/// dispatcher.send_mail(SendMailRequest::new("c@d.com", "Hi", "<p>hey</p>")).await?;
///
/// assert_eq!(observer.receipts()[0].accepted, vec!["c@d.com"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RecordingObserver {
    outgoing: Mutex<Vec<OutboundMessage>>,
    receipts: Mutex<Vec<DeliveryReceipt>>,
}

impl RecordingObserver {
    /// Create an empty recording observer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages seen before delivery
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn outgoing(&self) -> Vec<OutboundMessage> {
        self.outgoing.lock().unwrap().clone()
    }

    /// Receipts seen after delivery
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn receipts(&self) -> Vec<DeliveryReceipt> {
        self.receipts.lock().unwrap().clone()
    }
}

impl MailObserver for RecordingObserver {
    fn on_outgoing(&self, message: &OutboundMessage) {
        self.outgoing.lock().unwrap().push(message.clone());
    }

    fn on_receipt(&self, receipt: &DeliveryReceipt) {
        self.receipts.lock().unwrap().push(receipt.clone());
    }
}

/// Transporter that captures messages instead of delivering them
///
/// Each delivery is answered with a receipt accepting the primary
/// recipients and a sequential message id (`"recorded-1"`, `"recorded-2"`,
/// ...), or with a transport error when created via
/// [`failing`](Self::failing).
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    failure: Option<String>,
}

impl RecordingTransport {
    /// Create a transport that accepts everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that fails every delivery with `message`
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Arc::default(),
            failure: Some(message.into()),
        }
    }

    /// Number of messages delivered
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// All delivered messages
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Whether a message was delivered to `address` (primary or blind copy)
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn was_sent_to(&self, address: &str) -> bool {
        self.sent.lock().unwrap().iter().any(|message| {
            message.to.iter().any(|a| a == address)
                || message
                    .bcc
                    .as_ref()
                    .is_some_and(|bcc| bcc.iter().any(|a| a == address))
        })
    }

    /// Last delivered message
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (should never happen in tests)
    #[must_use]
    pub fn last_sent(&self) -> Option<OutboundMessage> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transporter for RecordingTransport {
    async fn deliver(&self, message: OutboundMessage) -> Result<DeliveryReceipt, MailError> {
        if let Some(failure) = &self.failure {
            return Err(MailError::transport(failure.clone()));
        }

        let accepted = message.to.to_list();
        let count = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(message);
            sent.len()
        };

        Ok(DeliveryReceipt {
            accepted,
            rejected: Vec::new(),
            pending: Vec::new(),
            message_id: format!("recorded-{count}"),
            response: "250 Recorded".to_string(),
        })
    }
}
