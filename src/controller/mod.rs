//! Timer controller.
//!
//! The controller is the facade the interface talks to. It relays
//! toggle/reset to the engine, turns engine updates into sound cues and
//! notifications, and computes the derived progress metrics.
//!
//! Starting is deferred by [`START_DELAY`] so the startup or unpause cue
//! can play before the countdown begins; a second toggle inside that
//! window cancels the start.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::engine::{self, EngineError, EngineHandle, TimerUpdate};
use crate::notification::{NotificationSender, Permission};
use crate::settings::Settings;
use crate::sound::SoundPlayer;
use crate::types::{SoundId, TimerState};

/// Delay between a start toggle and the first second of countdown.
pub const START_DELAY: Duration = Duration::from_millis(500);

/// Facade over one timer engine and its side-effect sinks.
pub struct TimerController {
    engine: EngineHandle,
    settings: Settings,
    sound: Arc<dyn SoundPlayer>,
    notifier: Arc<dyn NotificationSender>,
    /// Deferred start, if one is scheduled
    pending_start: Option<JoinHandle<()>>,
}

impl TimerController {
    /// Spawns an engine with a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be initialized.
    pub async fn new(
        settings: Settings,
        sound: Arc<dyn SoundPlayer>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Result<Self, EngineError> {
        Self::resume(settings, None, sound, notifier).await
    }

    /// Spawns an engine initialized from a snapshot handed over by another
    /// controller.
    ///
    /// A running snapshot resumes the cadence immediately, without a cue or
    /// start delay.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be initialized.
    pub async fn resume(
        settings: Settings,
        snapshot: Option<TimerState>,
        sound: Arc<dyn SoundPlayer>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Result<Self, EngineError> {
        let (engine, updates, _task) = engine::spawn(settings.clone());
        tokio::spawn(forward_updates(updates, sound.clone(), notifier.clone()));

        sound.set_volume(settings.volume);

        let was_running = snapshot.as_ref().is_some_and(|s| s.is_running);
        engine.init(settings.clone(), snapshot).await?;
        if was_running {
            debug!("Resuming running snapshot");
            engine.start(settings.clone()).await?;
        }

        Ok(Self {
            engine,
            settings,
            sound,
            notifier,
            pending_start: None,
        })
    }

    /// Pauses a running timer or schedules a start of a stopped one.
    ///
    /// The first toggle asks for notification permission if it was never
    /// requested. Toggling a finished session does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is gone.
    pub async fn toggle(&mut self) -> Result<(), EngineError> {
        if self.notifier.permission() == Permission::Default {
            let notifier = self.notifier.clone();
            match tokio::task::spawn_blocking(move || notifier.request_permission()).await {
                Ok(permission) => info!("Notification permission: {:?}", permission),
                Err(e) => warn!("Permission request failed: {}", e),
            }
        }

        if self.cancel_pending_start().await {
            // the start command may already be queued
            self.engine.stop().await?;
            self.cue(SoundId::Pause);
            return Ok(());
        }

        let snapshot = self.engine.snapshot();
        if snapshot.as_ref().is_some_and(|s| s.is_running) {
            self.engine.stop().await?;
            self.cue(SoundId::Pause);
            return Ok(());
        }
        if snapshot.as_ref().is_some_and(|s| s.is_finished) {
            debug!("Toggle ignored: session finished");
            return Ok(());
        }

        let initial = snapshot
            .as_ref()
            .map_or(true, |s| s.is_initial(&self.settings));
        self.cue(if initial {
            SoundId::Startup
        } else {
            SoundId::Unpause
        });
        self.schedule_start();
        Ok(())
    }

    /// Cancels a pending start, rebuilds the session from the current
    /// settings and stops every cue in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is gone.
    pub async fn reset(&mut self) -> Result<TimerState, EngineError> {
        self.cancel_pending_start().await;
        let state = self.engine.reset(self.settings.clone()).await?;
        self.sound.stop_all();
        Ok(state)
    }

    /// Replaces the settings and resets the session so they take effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is gone.
    pub async fn apply_settings(&mut self, settings: Settings) -> Result<TimerState, EngineError> {
        self.sound.set_volume(settings.volume);
        self.settings = settings;
        self.reset().await
    }

    /// Changes the cue volume without touching the session.
    pub fn set_volume(&mut self, volume: u8) {
        self.settings.volume = volume.min(100);
        self.sound.set_volume(self.settings.volume);
    }

    /// Returns the latest snapshot.
    pub fn snapshot(&self) -> Option<TimerState> {
        self.engine.snapshot()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<TimerState>> {
        self.engine.subscribe()
    }

    /// Returns the settings of the current session.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns true while a deferred start has not fired yet.
    pub fn is_start_pending(&self) -> bool {
        self.pending_start
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Session progress in percent, from 0 to 100.
    pub fn progress_percent(&self) -> f64 {
        let elapsed = self.snapshot().map_or(0, |s| s.elapsed_seconds);
        progress_percent(elapsed, total_session_seconds(&self.settings))
    }

    /// Stops the engine and returns the snapshot for another controller.
    ///
    /// The returned snapshot keeps the running flag it had before the
    /// handoff so the receiver can resume the cadence. A start still
    /// waiting out its delay counts as running.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is gone.
    pub async fn handoff(mut self) -> Result<Option<TimerState>, EngineError> {
        let start_pending = self.cancel_pending_start().await;
        let was_running = start_pending || self.snapshot().is_some_and(|s| s.is_running);
        let stopped = self.engine.stop().await?;
        Ok(stopped.map(|state| TimerState {
            is_running: was_running,
            ..state
        }))
    }

    /// Aborts the deferred start. Returns true if it had not fired yet.
    async fn cancel_pending_start(&mut self) -> bool {
        let Some(task) = self.pending_start.take() else {
            return false;
        };
        let pending = !task.is_finished();
        task.abort();
        let _ = task.await;
        if pending {
            debug!("Pending start cancelled");
        }
        pending
    }

    fn schedule_start(&mut self) {
        let engine = self.engine.clone();
        let settings = self.settings.clone();
        self.pending_start = Some(tokio::spawn(async move {
            tokio::time::sleep(START_DELAY).await;
            if engine.snapshot().is_some_and(|s| s.is_running) {
                return;
            }
            if let Err(e) = engine.start(settings).await {
                warn!("Deferred start failed: {}", e);
            }
        }));
    }

    fn cue(&self, sound: SoundId) {
        if let Err(e) = self.sound.play(sound) {
            warn!("Failed to play {}: {}", sound, e);
        }
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        if let Some(task) = self.pending_start.take() {
            task.abort();
        }
    }
}

/// Plays the cue and delivers the notification of each update, in order.
async fn forward_updates(
    mut updates: mpsc::UnboundedReceiver<TimerUpdate>,
    sound: Arc<dyn SoundPlayer>,
    notifier: Arc<dyn NotificationSender>,
) {
    while let Some(update) = updates.recv().await {
        if let Some(cue) = update.sound {
            if let Err(e) = sound.play(cue) {
                warn!("Failed to play {}: {}", cue, e);
            }
        }

        if let Some(request) = update.notification {
            let notifier = notifier.clone();
            match tokio::task::spawn_blocking(move || notifier.notify(&request)).await {
                Ok(Ok(Some(id))) => debug!("Notification {} sent", id),
                Ok(Ok(None)) => debug!("Notification not permitted"),
                Ok(Err(e)) => warn!("Notification failed: {}", e),
                Err(e) => warn!("Notification task failed: {}", e),
            }
        }
    }
    debug!("Update stream closed");
}

/// Length of a whole session in seconds.
///
/// Every set has `work_cycles` work intervals with a rest between each
/// pair; a long break separates consecutive sets.
pub fn total_session_seconds(settings: &Settings) -> u64 {
    let cycles = u64::from(settings.work_cycles.max(1));
    let sets = u64::from(settings.total_sets.max(1));
    let work = u64::from(settings.work_duration());
    let rest = u64::from(settings.rest_duration());
    let long_break = u64::from(settings.long_break_duration());

    sets * (work * cycles + rest * (cycles - 1)) + long_break * (sets - 1)
}

/// `elapsed / total` in percent, capped at 100. Zero when `total` is 0.
pub fn progress_percent(elapsed_seconds: u64, total_seconds: u64) -> f64 {
    if total_seconds == 0 {
        return 0.0;
    }
    (elapsed_seconds as f64 / total_seconds as f64 * 100.0).min(100.0)
}
