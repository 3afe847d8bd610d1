//! # Notifier Port

use crate::infrastructure::notification::error::NotificationResult;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

/// A report ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    /// Spreadsheet bytes.
    pub bytes: Bytes,
    /// Attachment file name.
    pub filename: String,
    /// Message subject.
    pub subject: String,
    /// Recipient address.
    pub recipient: String,
}

/// Delivery channel for rendered reports.
#[async_trait]
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Delivers one report.
    ///
    /// # Errors
    ///
    /// Returns a [`NotificationError`](super::NotificationError) if the
    /// message cannot be built or delivered. Delivery is not retried.
    async fn send(&self, attachment: &EmailAttachment) -> NotificationResult<()>;
}
