//! Core data types for the Pomodoro Timer.
//!
//! This module defines the data structures shared by the engine,
//! the controller and the presentation layer:
//! - Timer phases and the timer state snapshot
//! - Sound cue identifiers
//! - Notification requests emitted at phase transitions

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

// ============================================================================
// TimerPhase
// ============================================================================

/// The interval type currently being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerPhase {
    /// A work interval
    Work,
    /// A short rest between work intervals of the same set
    Rest,
    /// The long break between two sets
    LongBreak,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Work => "work",
            TimerPhase::Rest => "rest",
            TimerPhase::LongBreak => "longBreak",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TimerPhase::Work => "Work",
            TimerPhase::Rest => "Rest",
            TimerPhase::LongBreak => "Long break",
        }
    }

    /// Returns true for rest and long-break phases.
    pub fn is_break(&self) -> bool {
        matches!(self, TimerPhase::Rest | TimerPhase::LongBreak)
    }
}

impl Default for TimerPhase {
    fn default() -> Self {
        TimerPhase::Work
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Snapshot of the countdown, phase, cycle and set of a session.
///
/// The engine owns the only mutable instance; everything else holds copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Current phase
    pub phase: TimerPhase,
    /// Current work cycle within the active set (1-based)
    pub cycle: u32,
    /// Current set (1-based)
    pub set: u32,
    /// Whether the countdown is advancing
    pub is_running: bool,
    /// Terminal flag: the whole session has completed
    pub is_finished: bool,
    /// Seconds spent across the whole session
    pub elapsed_seconds: u64,
}

impl TimerState {
    /// Creates the state of a fresh session: first work cycle of the first set.
    pub fn new(settings: &Settings) -> Self {
        Self {
            remaining_seconds: settings.work_duration(),
            phase: TimerPhase::Work,
            cycle: 1,
            set: 1,
            is_running: false,
            is_finished: false,
            elapsed_seconds: 0,
        }
    }

    /// Returns true if this is the untouched start of a session.
    ///
    /// Used to choose between the `Startup` and `Unpause` cues.
    pub fn is_initial(&self, settings: &Settings) -> bool {
        self.phase == TimerPhase::Work
            && self.cycle == 1
            && self.set == 1
            && self.remaining_seconds == settings.work_duration()
    }

    /// Clamps a restored snapshot into the ranges allowed by `settings`.
    ///
    /// A restored snapshot never claims to be running: only the engine
    /// decides when the cadence is active.
    pub fn restored(mut self, settings: &Settings) -> Self {
        self.cycle = self.cycle.clamp(1, settings.work_cycles.max(1));
        self.set = self.set.clamp(1, settings.total_sets.max(1));
        self.is_running = false;
        self
    }
}

// ============================================================================
// SoundId
// ============================================================================

/// Identifiers of the audio cues played by the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundId {
    WorkStart,
    RestStart,
    LongBreak,
    Complete,
    Startup,
    WorkWarning,
    RestWarning,
    Pause,
    Unpause,
}

impl SoundId {
    /// Every cue, in a stable order.
    pub const ALL: [SoundId; 9] = [
        SoundId::WorkStart,
        SoundId::RestStart,
        SoundId::LongBreak,
        SoundId::Complete,
        SoundId::Startup,
        SoundId::WorkWarning,
        SoundId::RestWarning,
        SoundId::Pause,
        SoundId::Unpause,
    ];

    /// Returns the string representation of the cue.
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundId::WorkStart => "workStart",
            SoundId::RestStart => "restStart",
            SoundId::LongBreak => "longBreak",
            SoundId::Complete => "complete",
            SoundId::Startup => "startup",
            SoundId::WorkWarning => "workWarning",
            SoundId::RestWarning => "restWarning",
            SoundId::Pause => "pause",
            SoundId::Unpause => "unpause",
        }
    }

    /// Returns the file name the cue is loaded from inside a sound directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundId::WorkStart => "work_start.mp3",
            SoundId::RestStart => "rest_start.mp3",
            SoundId::LongBreak => "long_break.mp3",
            SoundId::Complete => "finish.mp3",
            SoundId::Startup => "startup.mp3",
            SoundId::WorkWarning => "work_warning.mp3",
            SoundId::RestWarning => "rest_warning.mp3",
            SoundId::Pause => "pause.mp3",
            SoundId::Unpause => "unpause.mp3",
        }
    }

    /// Returns the warning cue for the given phase.
    pub fn warning_for(phase: TimerPhase) -> Self {
        match phase {
            TimerPhase::Work => SoundId::WorkWarning,
            TimerPhase::Rest | TimerPhase::LongBreak => SoundId::RestWarning,
        }
    }
}

impl std::fmt::Display for SoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// NotificationRequest
// ============================================================================

/// A system notification requested by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Notification title
    pub title: String,
    /// Notification body
    pub body: String,
}

impl NotificationRequest {
    /// Creates a new notification request.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
