//! Observability sink for send operations
//!
//! Every send emits two records: the outgoing message before delivery and
//! the receipt after it. The sink is injected into the dispatcher, so tests
//! can capture both records without a global subscriber.

use tracing::info;

use super::{DeliveryReceipt, OutboundMessage};

/// Receives the pre-send and post-send records of every delivery
pub trait MailObserver: Send + Sync {
    /// Called with the normalized message just before delivery
    fn on_outgoing(&self, message: &OutboundMessage);

    /// Called with the receipt after a successful delivery
    fn on_receipt(&self, receipt: &DeliveryReceipt);
}

/// Default observer, emitting `tracing` events
///
/// HTML and text bodies are logged JSON-encoded so multi-line content stays
/// on one log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MailObserver for TracingObserver {
    fn on_outgoing(&self, message: &OutboundMessage) {
        info!(
            to = %message.to,
            bcc = ?message.bcc.as_ref().map(ToString::to_string),
            subject = %message.subject,
            html = %serde_json::Value::from(message.html.as_str()),
            text = %serde_json::Value::from(message.text.as_str()),
            attachments = message.attachments.len(),
            "Sending email"
        );
    }

    fn on_receipt(&self, receipt: &DeliveryReceipt) {
        info!(
            accepted = ?receipt.accepted,
            rejected = ?receipt.rejected,
            pending = ?receipt.pending,
            message_id = %receipt.message_id,
            response = %receipt.response,
            "Email sent"
        );
    }
}
