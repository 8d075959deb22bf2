//! zen-pomodoro library
//!
//! This library provides the core functionality of the zen-pomodoro timer.
//! It includes:
//! - The phase state machine and the off-thread timer engine
//! - The timer controller facade with deferred start and view handoff
//! - Settings with JSON persistence
//! - Sound cue playback and desktop notifications
//! - CLI command parsing, display and the interactive session

pub mod cli;
pub mod controller;
pub mod engine;
pub mod notification;
pub mod settings;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{NotificationRequest, SoundId, TimerPhase, TimerState};

pub use controller::{progress_percent, total_session_seconds, TimerController, START_DELAY};

pub use engine::{EngineCommand, EngineError, EngineHandle, TimerEngine, TimerUpdate};

pub use settings::{SettingKey, Settings, SettingsError, SettingsStore};

// Re-export notification types
pub use notification::{
    DesktopNotifier, MockNotificationSender, NotificationError, NotificationSender, Permission,
};

// Re-export sound types
pub use sound::{
    try_create_player, MockSoundPlayer, RodioSoundPlayer, SilentSoundPlayer, SoundError,
    SoundLibrary, SoundPlayer, SoundSource,
};
