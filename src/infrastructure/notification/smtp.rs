//! # SMTP Notifier
//!
//! Sends the report as an email attachment through an SMTP relay.

use crate::infrastructure::notification::error::{NotificationError, NotificationResult};
use crate::infrastructure::notification::traits::{EmailAttachment, Notifier};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

/// MIME type of xlsx workbooks.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Connection settings for [`SmtpNotifier`].
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// Relay host.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Use TLS to the relay.
    pub tls: bool,
    /// Login user; no authentication when empty.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Sender address.
    pub from: String,
}

/// [`Notifier`] sending mail through SMTP.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    /// Creates a notifier for the given relay.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::Address` for a malformed sender and
    /// `NotificationError::Transport` if the relay cannot be configured.
    pub fn new(settings: &SmtpSettings) -> NotificationResult<Self> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| NotificationError::address(format!("{}: {}", settings.from, e)))?;

        let mut builder = if settings.tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| NotificationError::transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };
        builder = builder.port(settings.port);
        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Builds the message for `attachment`.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed recipient or an unbuildable message.
    pub fn build_message(&self, attachment: &EmailAttachment) -> NotificationResult<Message> {
        let to: Mailbox = attachment.recipient.parse().map_err(|e| {
            NotificationError::address(format!("{}: {}", attachment.recipient, e))
        })?;
        let content_type = ContentType::parse(XLSX_CONTENT_TYPE)
            .map_err(|e| NotificationError::message(e.to_string()))?;

        let body = SinglePart::plain(format!(
            "Please find the {} report attached.",
            attachment.subject
        ));
        let file = Attachment::new(attachment.filename.clone())
            .body(attachment.bytes.to_vec(), content_type);

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(attachment.subject.clone())
            .multipart(MultiPart::mixed().singlepart(body).singlepart(file))
            .map_err(|e| NotificationError::message(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, attachment: &EmailAttachment) -> NotificationResult<()> {
        let message = self.build_message(attachment)?;
        match self.transport.send(message).await {
            Ok(_) => {
                info!(recipient = %attachment.recipient, filename = %attachment.filename, "email sent");
                Ok(())
            }
            Err(e) => {
                warn!(recipient = %attachment.recipient, error = %e, "email delivery failed");
                Err(NotificationError::transport(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "localhost".to_string(),
            port: 2525,
            tls: false,
            username: String::new(),
            password: String::new(),
            from: "Reports <reports@example.com>".to_string(),
        }
    }

    fn attachment(recipient: &str) -> EmailAttachment {
        EmailAttachment {
            bytes: Bytes::from_static(b"PK\x03\x04"),
            filename: "acme_hourly_orders.xlsx".to_string(),
            subject: "Hourly Orders".to_string(),
            recipient: recipient.to_string(),
        }
    }

    #[test]
    fn rejects_malformed_sender() {
        let mut settings = settings();
        settings.from = "not an address".to_string();
        let err = SmtpNotifier::new(&settings).unwrap_err();
        assert!(matches!(err, NotificationError::Address(_)));
    }

    #[tokio::test]
    async fn message_carries_xlsx_attachment() {
        let notifier = SmtpNotifier::new(&settings()).unwrap();
        let message = notifier.build_message(&attachment("ops@example.com")).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("Subject: Hourly Orders"));
        assert!(raw.contains(XLSX_CONTENT_TYPE));
        assert!(raw.contains("acme_hourly_orders.xlsx"));
    }

    #[tokio::test]
    async fn rejects_malformed_recipient() {
        let notifier = SmtpNotifier::new(&settings()).unwrap();
        let err = notifier.build_message(&attachment("nobody")).unwrap_err();
        assert!(matches!(err, NotificationError::Address(_)));
    }

    #[tokio::test]
    async fn unreachable_relay_is_transport_error() {
        let mut settings = settings();
        settings.host = "127.0.0.1".to_string();
        settings.port = 1;
        let notifier = SmtpNotifier::new(&settings).unwrap();
        let err = notifier.send(&attachment("ops@example.com")).await.unwrap_err();
        assert!(err.is_transport());
    }
}
