//! Pure phase state machine.
//!
//! [`advance`] is one second of countdown and [`complete_phase`] the
//! transition table. Neither performs I/O; the side effects are returned
//! as [`Effects`] for the engine to publish.

use tracing::info;

use crate::notification::content;
use crate::settings::Settings;
use crate::types::{NotificationRequest, SoundId, TimerPhase, TimerState};

/// Remaining seconds at which the warning cue plays.
pub const WARNING_THRESHOLD_SECONDS: u32 = 5;

/// Side effects produced by one step of the state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    /// Cue to play, if any
    pub sound: Option<SoundId>,
    /// Notification to deliver, if any
    pub notification: Option<NotificationRequest>,
}

impl Effects {
    fn sound(sound: SoundId) -> Self {
        Self {
            sound: Some(sound),
            notification: None,
        }
    }

    fn transition(sound: SoundId, notification: NotificationRequest) -> Self {
        Self {
            sound: Some(sound),
            notification: Some(notification),
        }
    }

    /// Returns true if there is nothing to publish.
    pub fn is_empty(&self) -> bool {
        self.sound.is_none() && self.notification.is_none()
    }
}

/// Advances the countdown by one second.
///
/// The warning cue fires when the countdown reaches exactly
/// [`WARNING_THRESHOLD_SECONDS`]; a phase that starts at or below the
/// threshold never warns. Reaching zero completes the phase in the same
/// step, and the transition's effects replace the warning.
pub fn advance(state: &mut TimerState, settings: &Settings) -> Effects {
    if state.is_finished {
        state.is_running = false;
        return Effects::default();
    }

    let mut effects = Effects::default();
    if state.remaining_seconds > 0 {
        state.remaining_seconds -= 1;
        state.elapsed_seconds += 1;

        if state.remaining_seconds == WARNING_THRESHOLD_SECONDS {
            effects = Effects::sound(SoundId::warning_for(state.phase));
        }
    }

    if state.remaining_seconds == 0 {
        effects = complete_phase(state, settings);
    }
    effects
}

/// Applies the phase transition table to a phase whose countdown is over.
pub fn complete_phase(state: &mut TimerState, settings: &Settings) -> Effects {
    if state.is_finished {
        state.is_running = false;
        return Effects::default();
    }

    let last_cycle = state.cycle >= settings.work_cycles;
    let last_set = state.set >= settings.total_sets;

    let effects = match state.phase {
        TimerPhase::Work if last_cycle && last_set => finish(state),
        TimerPhase::Work if !last_cycle => {
            state.phase = TimerPhase::Rest;
            state.remaining_seconds = settings.rest_duration();
            Effects::transition(SoundId::RestStart, content::rest_started(state.cycle))
        }
        TimerPhase::Work => {
            state.phase = TimerPhase::LongBreak;
            state.remaining_seconds = settings.long_break_duration();
            Effects::transition(
                SoundId::LongBreak,
                content::long_break_started(state.cycle),
            )
        }
        TimerPhase::Rest => {
            state.cycle += 1;
            state.phase = TimerPhase::Work;
            state.remaining_seconds = settings.work_duration();
            Effects::transition(SoundId::WorkStart, content::work_started(state.cycle))
        }
        TimerPhase::LongBreak if !last_set => {
            state.set += 1;
            state.cycle = 1;
            state.phase = TimerPhase::Work;
            state.remaining_seconds = settings.work_duration();
            Effects::transition(SoundId::WorkStart, content::set_started(state.cycle))
        }
        TimerPhase::LongBreak => finish(state),
    };

    info!(
        "Phase complete: now {} (cycle {}, set {}){}",
        state.phase.as_str(),
        state.cycle,
        state.set,
        if state.is_finished { ", session finished" } else { "" }
    );
    effects
}

fn finish(state: &mut TimerState) -> Effects {
    state.is_running = false;
    state.is_finished = true;
    Effects::transition(SoundId::Complete, content::session_complete())
}
