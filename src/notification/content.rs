//! Notification texts for phase transitions.

use crate::types::NotificationRequest;

/// Maximum length of a title or body handed to the desktop.
const MAX_TEXT_LENGTH: usize = 200;

/// Title shown when the whole session is complete.
pub const SESSION_COMPLETE_TITLE: &str = "Pomodoro complete!";
/// Title shown when a rest begins.
pub const REST_TITLE: &str = "Time to rest!";
/// Title shown when a long break begins.
pub const LONG_BREAK_TITLE: &str = "Long break!";
/// Title shown when a work interval begins.
pub const WORK_TITLE: &str = "Time to work!";

/// The whole session is complete.
#[must_use]
pub fn session_complete() -> NotificationRequest {
    NotificationRequest::new(
        SESSION_COMPLETE_TITLE,
        "The whole pomodoro session is complete.",
    )
}

/// A rest begins after work cycle `cycle`.
#[must_use]
pub fn rest_started(cycle: u32) -> NotificationRequest {
    NotificationRequest::new(REST_TITLE, format!("Rest period {} is starting.", cycle))
}

/// A long break begins after `cycles` work cycles.
#[must_use]
pub fn long_break_started(cycles: u32) -> NotificationRequest {
    NotificationRequest::new(
        LONG_BREAK_TITLE,
        format!("A long break is starting after {} work cycles.", cycles),
    )
}

/// Work cycle `cycle` of the current set begins.
#[must_use]
pub fn work_started(cycle: u32) -> NotificationRequest {
    NotificationRequest::new(WORK_TITLE, format!("Work cycle {} is starting.", cycle))
}

/// A new set begins with work cycle `cycle`.
#[must_use]
pub fn set_started(cycle: u32) -> NotificationRequest {
    NotificationRequest::new(
        WORK_TITLE,
        format!("A new set is starting, work cycle {}.", cycle),
    )
}

/// Strips control characters and truncates text for the desktop.
///
/// Returns None if nothing printable remains.
pub fn sanitize_text(text: &str) -> Option<String> {
    let sanitized: String = text
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_TEXT_LENGTH)
        .collect();

    if sanitized.trim().is_empty() {
        None
    } else {
        Some(sanitized)
    }
}
