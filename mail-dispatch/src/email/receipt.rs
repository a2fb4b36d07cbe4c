//! Delivery receipts

use serde::{Deserialize, Serialize};

/// Message id reported by the echo transport
pub const ECHO_MESSAGE_ID: &str = "0";

/// Response text reported by the echo transport
pub const ECHO_RESPONSE: &str = "Email sent by dummy service";

/// Outcome of a delivery, as reported by a transporter
///
/// Rejected or pending addresses on a receipt are data, not errors: the
/// delivery as a whole still succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Addresses the transport accepted
    pub accepted: Vec<String>,

    /// Addresses the transport rejected
    pub rejected: Vec<String>,

    /// Addresses still awaiting a verdict
    pub pending: Vec<String>,

    /// Identifier of the delivered message
    pub message_id: String,

    /// Human-readable transport response
    pub response: String,
}

impl DeliveryReceipt {
    /// Receipt fabricated by the echo transport
    #[must_use]
    pub fn echo(accepted: Vec<String>) -> Self {
        Self {
            accepted,
            rejected: Vec::new(),
            pending: Vec::new(),
            message_id: ECHO_MESSAGE_ID.to_string(),
            response: ECHO_RESPONSE.to_string(),
        }
    }

    /// Whether every address was accepted
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.rejected.is_empty() && self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_receipt() {
        let receipt = DeliveryReceipt::echo(vec!["c@d.com".to_string()]);

        assert_eq!(receipt.accepted, vec!["c@d.com"]);
        assert!(receipt.rejected.is_empty());
        assert!(receipt.pending.is_empty());
        assert_eq!(receipt.message_id, "0");
        assert_eq!(receipt.response, "Email sent by dummy service");
        assert!(receipt.is_complete());
    }

    #[test]
    fn test_partial_rejection_is_incomplete() {
        let receipt = DeliveryReceipt {
            accepted: vec!["a@x.com".to_string()],
            rejected: vec!["b@x.com".to_string()],
            ..DeliveryReceipt::default()
        };
        assert!(!receipt.is_complete());
    }
}
