//! Desktop notifications through `notify-rust`.
//!
//! On Linux and the BSDs notifications go to the freedesktop notification
//! server over D-Bus, and permission is granted when that server answers.
//! On macOS and Windows the platform always accepts the request.

use std::sync::Mutex;

use notify_rust::Notification;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::content::sanitize_text;
use super::error::NotificationError;
use super::{NotificationSender, Permission};
use crate::types::NotificationRequest;

/// Application name shown by the notification server.
const APP_NAME: &str = "zen-pomodoro";

/// Sends notifications through the platform notification service.
#[derive(Debug)]
pub struct DesktopNotifier {
    permission: Mutex<Permission>,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifier {
    /// Creates a notifier whose permission has not been requested yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            permission: Mutex::new(Permission::Default),
        }
    }

    /// Creates a notifier that never delivers anything.
    #[must_use]
    pub fn denied() -> Self {
        Self {
            permission: Mutex::new(Permission::Denied),
        }
    }
}

/// Asks the notification service whether it can take notifications.
#[cfg(all(unix, not(target_os = "macos")))]
fn probe_service() -> Permission {
    match notify_rust::get_server_information() {
        Ok(server) => {
            info!(
                "Desktop notifications enabled via {} {}",
                server.name, server.version
            );
            Permission::Granted
        }
        Err(e) => {
            warn!("No notification server available, notifications disabled: {}", e);
            Permission::Denied
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn probe_service() -> Permission {
    info!("Desktop notifications enabled");
    Permission::Granted
}

impl NotificationSender for DesktopNotifier {
    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn request_permission(&self) -> Permission {
        let mut permission = self.permission.lock().unwrap_or_else(|e| e.into_inner());
        if *permission == Permission::Default {
            *permission = probe_service();
        }
        *permission
    }

    fn notify(&self, request: &NotificationRequest) -> Result<Option<Uuid>, NotificationError> {
        if self.permission() != Permission::Granted {
            debug!("Notification skipped, permission not granted");
            return Ok(None);
        }

        let title = sanitize_text(&request.title)
            .ok_or_else(|| NotificationError::InvalidInput("empty title".to_string()))?;
        let body = sanitize_text(&request.body).unwrap_or_default();

        Notification::new()
            .summary(&title)
            .body(&body)
            .appname(APP_NAME)
            .show()
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        let id = Uuid::new_v4();
        debug!("Notification {} delivered: {}", id, title);
        Ok(Some(id))
    }
}
