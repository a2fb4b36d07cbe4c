//! Send requests and the normalized outbound message

use serde::{Deserialize, Serialize};
use std::fmt;

use super::text::html_to_text;

/// One address or an ordered list of addresses
///
/// The shape the caller chose is kept all the way to the transport. Only the
/// echo transport flattens it, via [`Recipients::to_list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    /// A single address
    One(String),
    /// An ordered list of addresses
    Many(Vec<String>),
}

impl Recipients {
    /// Addresses as a list: a single address becomes a one-element list
    #[must_use]
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Self::One(address) => vec![address.clone()],
            Self::Many(addresses) => addresses.clone(),
        }
    }

    /// Iterate over the addresses in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::One(address) => std::slice::from_ref(address),
            Self::Many(addresses) => addresses,
        };
        slice.iter().map(String::as_str)
    }

    /// Number of addresses
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(addresses) => addresses.len(),
        }
    }

    /// Whether there are no addresses (only possible for an empty list)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Recipients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(address) => f.write_str(address),
            Self::Many(addresses) => f.write_str(&addresses.join(", ")),
        }
    }
}

impl From<&str> for Recipients {
    fn from(address: &str) -> Self {
        Self::One(address.to_string())
    }
}

impl From<String> for Recipients {
    fn from(address: String) -> Self {
        Self::One(address)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(addresses: Vec<String>) -> Self {
        Self::Many(addresses)
    }
}

impl From<Vec<&str>> for Recipients {
    fn from(addresses: Vec<&str>) -> Self {
        Self::Many(addresses.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Recipients {
    fn from(addresses: &[&str]) -> Self {
        Self::Many(addresses.iter().map(|a| (*a).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Recipients {
    fn from(addresses: [&str; N]) -> Self {
        Self::Many(addresses.iter().map(|a| (*a).to_string()).collect())
    }
}

/// File attached to a message
///
/// The content is handed to the transport as-is; encoding is the
/// transport's job.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// File name shown to the recipient
    pub filename: String,

    /// MIME type, e.g. `application/pdf`
    pub content_type: String,

    /// Raw bytes
    pub content: Vec<u8>,
}

impl Attachment {
    /// Create an attachment
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: content.into(),
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.content.len())
            .finish()
    }
}

/// What a caller asks to send
///
/// ```rust
/// use mail_dispatch::email::SendMailRequest;
///
/// let request = SendMailRequest::new(["a@example.com", "b@example.com"], "Hi", "<p>hey</p>")
///     .bcc("audit@example.com")
///     .reply_to("support@example.com");
///
/// assert_eq!(request.to.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMailRequest {
    /// Primary recipients
    pub to: Recipients,

    /// Subject line
    pub subject: String,

    /// HTML body
    pub content: String,

    /// Blind-copy recipients
    #[serde(default)]
    pub bcc: Option<Recipients>,

    /// Reply-To address
    #[serde(default)]
    pub reply_to: Option<String>,

    /// Attachments, forwarded verbatim
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl SendMailRequest {
    /// Create a request with the required fields
    #[must_use]
    pub fn new(
        to: impl Into<Recipients>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            content: content.into(),
            bcc: None,
            reply_to: None,
            attachments: Vec::new(),
        }
    }

    /// Set blind-copy recipients
    #[must_use]
    pub fn bcc(mut self, bcc: impl Into<Recipients>) -> Self {
        self.bcc = Some(bcc.into());
        self
    }

    /// Set the Reply-To address
    #[must_use]
    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    /// Add an attachment
    #[must_use]
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// A request normalized into the shape every transport accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Sender identity, `"Name" <address>`
    pub from: String,

    /// Primary recipients, in the caller's shape
    pub to: Recipients,

    /// Blind-copy recipients, in the caller's shape
    pub bcc: Option<Recipients>,

    /// Subject line
    pub subject: String,

    /// HTML body
    pub html: String,

    /// Plain-text rendition of `html`
    pub text: String,

    /// Reply-To address
    pub reply_to: Option<String>,

    /// Attachments
    pub attachments: Vec<Attachment>,
}

impl OutboundMessage {
    /// Normalize a request for the given sender
    ///
    /// The plain-text body is always derived, whether or not the transport
    /// ends up using it.
    #[must_use]
    pub fn compose(sender: &str, request: SendMailRequest) -> Self {
        let text = html_to_text(&request.content);

        Self {
            from: sender.to_string(),
            to: request.to,
            bcc: request.bcc,
            subject: request.subject,
            html: request.content,
            text,
            reply_to: request.reply_to,
            attachments: request.attachments,
        }
    }
}
