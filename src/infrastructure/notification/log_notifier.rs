//! # Log Notifier

use crate::infrastructure::notification::error::NotificationResult;
use crate::infrastructure::notification::traits::{EmailAttachment, Notifier};
use async_trait::async_trait;
use tracing::info;

/// [`Notifier`] that only logs the delivery it would have made.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Creates a log notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, attachment: &EmailAttachment) -> NotificationResult<()> {
        info!(
            recipient = %attachment.recipient,
            subject = %attachment.subject,
            filename = %attachment.filename,
            size = attachment.bytes.len(),
            "email delivery disabled, skipping send"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn always_succeeds() {
        let attachment = EmailAttachment {
            bytes: Bytes::from_static(b"PK"),
            filename: "acme_total_fare.xlsx".to_string(),
            subject: "Total Fare report".to_string(),
            recipient: "ops@example.com".to_string(),
        };
        LogNotifier::new().send(&attachment).await.unwrap();
    }
}
