//! Append-only log of notifications sent to readers.

use serde::{Deserialize, Serialize};

/// One message delivered to a reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient address.
    pub email: String,
    /// Subject line; the book title.
    pub subject: String,
    /// Body text.
    pub message: String,
}

/// Notification history in send order.
///
/// Sending is an in-memory append; nothing leaves the process.
#[derive(Debug, Default)]
pub struct NotificationLog {
    sent: Vec<Notification>,
}

impl NotificationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a notification.
    pub fn notify(
        &mut self,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let notification = Notification {
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        };
        tracing::debug!(
            email = %notification.email,
            subject = %notification.subject,
            "notification sent"
        );
        self.sent.push(notification);
    }

    /// Every notification sent so far, oldest first.
    pub fn history(&self) -> &[Notification] {
        &self.sent
    }
}
