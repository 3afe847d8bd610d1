//! # Notification Errors

use thiserror::Error;

/// Error delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// A sender or recipient address is malformed.
    #[error("Invalid address: {0}")]
    Address(String),

    /// The message could not be assembled.
    #[error("Message error: {0}")]
    Message(String),

    /// The transport rejected or failed to deliver the message.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl NotificationError {
    /// Creates an address error.
    #[must_use]
    pub fn address(message: impl Into<String>) -> Self {
        Self::Address(message.into())
    }

    /// Creates a message error.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns true if the failure happened on the wire.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;
