//! Notification system error types.
//!
//! A failed or denied notification never stops the timer; the session
//! continues with sound cues only.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to send a notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// Notification permission was denied.
    #[error("notification permission denied")]
    PermissionDenied,

    /// Invalid input provided to the notification system.
    #[error("invalid notification: {0}")]
    InvalidInput(String),

    /// No desktop notification tool is available.
    #[error("no desktop notification tool available")]
    NotAvailable,
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::NotAvailable)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => "check that a notification server is running",
            Self::PermissionDenied => "allow notifications for the terminal in the system settings",
            Self::InvalidInput(_) => "notification text must contain printable characters",
            Self::NotAvailable => "start a freedesktop notification server for the session",
        }
    }
}
