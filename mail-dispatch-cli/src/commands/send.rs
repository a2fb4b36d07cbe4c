//! Send command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use mail_dispatch::prelude::*;

use super::{load_config, SUCCESS};

/// Content type used for files attached from the command line
const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// Send one HTML message
#[derive(Debug, Args)]
pub struct SendCommand {
    /// Recipient address (repeat for several)
    #[arg(long, required = true, value_name = "ADDRESS")]
    to: Vec<String>,

    /// Subject line
    #[arg(short, long)]
    subject: String,

    /// HTML body
    #[arg(long, conflicts_with = "html_file", required_unless_present = "html_file")]
    html: Option<String>,

    /// Read the HTML body from a file
    #[arg(long, value_name = "PATH")]
    html_file: Option<PathBuf>,

    /// Blind-copy address (repeat for several)
    #[arg(long, value_name = "ADDRESS")]
    bcc: Vec<String>,

    /// Reply-To address
    #[arg(long, value_name = "ADDRESS")]
    reply_to: Option<String>,

    /// File to attach (repeat for several)
    #[arg(long, value_name = "PATH")]
    attach: Vec<PathBuf>,

    /// Configuration file (defaults to `mail.toml` plus `MAIL_*` variables)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl SendCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration cannot be loaded or is invalid
    /// - The body or an attachment cannot be read
    /// - The relay rejects the message
    pub async fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let dispatcher = MailDispatcher::new(config).context("Invalid mail configuration")?;
        let request = self.into_request().await?;

        println!(
            "{} {} {}",
            style("Sending").green().bold(),
            style(&request.subject).bold(),
            style(format!("to {}", request.to)).dim()
        );

        let message_id = dispatcher
            .send_mail(request)
            .await
            .context("Failed to send message")?;

        println!(
            "{SUCCESS} Sent via {} transport",
            style(transport_label(dispatcher.transport_kind())).cyan()
        );
        println!("  {} {}", style("Message-ID:").bold(), style(message_id).cyan());

        Ok(())
    }

    async fn into_request(self) -> Result<SendMailRequest> {
        let html = match (self.html, self.html_file) {
            (Some(html), _) => html,
            (None, Some(path)) => tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read HTML body from {}", path.display()))?,
            (None, None) => anyhow::bail!("No HTML body given"),
        };

        let mut request = SendMailRequest::new(recipients(self.to), self.subject, html);
        if !self.bcc.is_empty() {
            request = request.bcc(recipients(self.bcc));
        }
        if let Some(reply_to) = self.reply_to {
            request = request.reply_to(reply_to);
        }
        for path in &self.attach {
            request = request.attachment(read_attachment(path).await?);
        }

        Ok(request)
    }
}

fn transport_label(kind: Option<TransportKind>) -> String {
    kind.as_ref().map_or_else(|| "unknown".to_string(), ToString::to_string)
}

/// A single address stays a single address; repeats become a list
fn recipients(mut addresses: Vec<String>) -> Recipients {
    if addresses.len() == 1 {
        Recipients::One(addresses.remove(0))
    } else {
        Recipients::Many(addresses)
    }
}

async fn read_attachment(path: &Path) -> Result<Attachment> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Attachment path has no file name: {}", path.display()))?;
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read attachment {}", path.display()))?;

    Ok(Attachment::new(filename, ATTACHMENT_CONTENT_TYPE, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn command(html: Option<&str>, html_file: Option<PathBuf>) -> SendCommand {
        SendCommand {
            to: vec!["c@d.com".to_string()],
            subject: "Hi".to_string(),
            html: html.map(ToString::to_string),
            html_file,
            bcc: Vec::new(),
            reply_to: None,
            attach: Vec::new(),
            config: None,
        }
    }

    #[test]
    fn test_recipients_shape() {
        assert_eq!(
            recipients(vec!["a@x.com".to_string()]),
            Recipients::One("a@x.com".to_string())
        );
        assert_eq!(
            recipients(vec!["b@x.com".to_string(), "a@x.com".to_string()]),
            Recipients::Many(vec!["b@x.com".to_string(), "a@x.com".to_string()])
        );
    }

    #[test]
    fn test_transport_label() {
        assert_eq!(transport_label(Some(TransportKind::Echo)), "echo");
        assert_eq!(transport_label(Some(TransportKind::Network)), "network");
        assert_eq!(transport_label(None), "unknown");
    }

    #[tokio::test]
    async fn test_request_from_inline_html() {
        let mut cmd = command(Some("<p>hey</p>"), None);
        cmd.bcc = vec!["audit@d.com".to_string()];
        cmd.reply_to = Some("support@b.com".to_string());

        let request = cmd.into_request().await.unwrap();

        assert_eq!(request.to, Recipients::One("c@d.com".to_string()));
        assert_eq!(request.content, "<p>hey</p>");
        assert_eq!(request.bcc, Some(Recipients::One("audit@d.com".to_string())));
        assert_eq!(request.reply_to.as_deref(), Some("support@b.com"));
        assert!(request.attachments.is_empty());
    }

    #[tokio::test]
    async fn test_request_reads_body_and_attachments() {
        let dir = tempfile::tempdir().unwrap();
        let body = dir.path().join("body.html");
        let report = dir.path().join("report.csv");
        fs::write(&body, "<h1>Report</h1>").unwrap();
        fs::write(&report, b"a,b\n1,2\n").unwrap();

        let mut cmd = command(None, Some(body));
        cmd.attach = vec![report];

        let request = cmd.into_request().await.unwrap();

        assert_eq!(request.content, "<h1>Report</h1>");
        assert_eq!(request.bcc, None);
        assert_eq!(
            request.attachments,
            vec![Attachment::new(
                "report.csv",
                ATTACHMENT_CONTENT_TYPE,
                b"a,b\n1,2\n".to_vec()
            )]
        );
    }

    #[tokio::test]
    async fn test_missing_attachment_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cmd = command(Some("<p>hey</p>"), None);
        cmd.attach = vec![dir.path().join("missing.pdf")];

        let error = cmd.into_request().await.unwrap_err();
        assert!(error.to_string().contains("missing.pdf"));
    }
}
