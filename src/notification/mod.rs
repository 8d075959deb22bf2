//! System notifications for phase transitions.
//!
//! This module provides:
//!
//! - The [`NotificationSender`] trait used by the controller
//! - [`DesktopNotifier`], backed by `notify-rust`
//! - Notification texts for every transition
//! - A mock sender for tests
//!
//! Delivery requires [`Permission::Granted`]; until then `notify` is a
//! no-op and the timer keeps working with sound cues only.

pub mod content;
mod desktop;
pub mod error;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::desktop::DesktopNotifier;
pub use self::error::NotificationError;

use crate::types::NotificationRequest;

/// Notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    /// Notifications are delivered.
    Granted,
    /// Notifications are dropped.
    Denied,
    /// Not asked yet.
    #[default]
    Default,
}

/// Trait for notification delivery.
///
/// Implementations are called from blocking contexts and shared between
/// tasks, so they must be `Send + Sync`.
pub trait NotificationSender: Send + Sync {
    /// Returns the current permission without asking.
    fn permission(&self) -> Permission;

    /// Asks for permission if it is still `Default` and returns the answer.
    fn request_permission(&self) -> Permission;

    /// Delivers a notification.
    ///
    /// Returns the delivery id, or None when permission is not granted.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery was attempted and failed.
    fn notify(&self, request: &NotificationRequest) -> Result<Option<Uuid>, NotificationError>;
}

/// Mock notification sender for testing.
#[derive(Debug)]
pub struct MockNotificationSender {
    notifications: Mutex<Vec<NotificationRequest>>,
    permission: Mutex<Permission>,
    answer: Mutex<Permission>,
    request_calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl Default for MockNotificationSender {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationSender {
    /// Creates a sender that is already granted.
    #[must_use]
    pub fn new() -> Self {
        Self::with_permission(Permission::Granted)
    }

    /// Creates a sender starting at `permission`; requests answer `Granted`.
    #[must_use]
    pub fn with_permission(permission: Permission) -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            permission: Mutex::new(permission),
            answer: Mutex::new(Permission::Granted),
            request_calls: AtomicUsize::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    /// Sets the answer given to the next permission request.
    pub fn set_answer(&self, answer: Permission) {
        *self.answer.lock().unwrap() = answer;
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<NotificationRequest> {
        self.notifications.lock().unwrap().clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }
}

impl NotificationSender for MockNotificationSender {
    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&self) -> Permission {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        let mut permission = self.permission.lock().unwrap();
        if *permission == Permission::Default {
            *permission = *self.answer.lock().unwrap();
        }
        *permission
    }

    fn notify(&self, request: &NotificationRequest) -> Result<Option<Uuid>, NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        if self.permission() != Permission::Granted {
            return Ok(None);
        }
        self.notifications.lock().unwrap().push(request.clone());
        Ok(Some(Uuid::new_v4()))
    }
}
