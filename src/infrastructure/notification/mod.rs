//! # Notification
//!
//! Delivers rendered reports to their recipient.
//!
//! - [`Notifier`]: port
//! - [`SmtpNotifier`]: email with the spreadsheet attached
//! - [`LogNotifier`]: records the would-be delivery when email is disabled

pub mod error;
pub mod log_notifier;
pub mod smtp;
pub mod traits;

pub use error::{NotificationError, NotificationResult};
pub use log_notifier::LogNotifier;
pub use smtp::{SmtpNotifier, SmtpSettings, XLSX_CONTENT_TYPE};
pub use traits::{EmailAttachment, Notifier};
