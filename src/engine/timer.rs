//! Timer engine task for the Pomodoro Timer.
//!
//! This module provides the off-thread countdown:
//! - Command handling (init / start / stop / reset)
//! - The 1 s cadence with tokio::time::interval
//! - Publishing snapshots and side-effect signals
//!
//! The state transitions themselves live in [`super::machine`].

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, warn};

use super::machine::{self, Effects};
use super::EngineError;
use crate::settings::Settings;
use crate::types::{NotificationRequest, SoundId, TimerState};

/// Period of the countdown cadence.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Capacity of the command channel.
const COMMAND_BUFFER: usize = 32;

// ============================================================================
// EngineCommand / TimerUpdate
// ============================================================================

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// (Re)create the state, optionally from a snapshot. Halts the cadence.
    Init {
        /// Settings for the session
        settings: Settings,
        /// Snapshot overriding the fresh state
        initial_state: Option<TimerState>,
    },
    /// Begin the cadence if not running.
    Start {
        /// Settings replacing the stored configuration
        settings: Settings,
    },
    /// Halt the cadence.
    Stop,
    /// Halt the cadence and rebuild the state from the settings.
    Reset {
        /// Settings for the new session
        settings: Settings,
    },
}

/// One message published by the engine: a snapshot plus its side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerUpdate {
    /// State after the command or tick
    pub state: TimerState,
    /// Cue to play, if any
    pub sound: Option<SoundId>,
    /// Notification to deliver, if any
    pub notification: Option<NotificationRequest>,
}

type Ack = oneshot::Sender<Result<Option<TimerState>, EngineError>>;

struct Envelope {
    command: EngineCommand,
    ack: Ack,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Owner of the timer state.
///
/// The command methods are synchronous; the task started by [`spawn`]
/// drives them from a command channel and adds the cadence.
pub struct TimerEngine {
    /// Configuration used by ticks and resets
    settings: Settings,
    /// Current timer state, absent until the first init/start/reset
    state: Option<TimerState>,
    /// Update sender channel
    update_tx: mpsc::UnboundedSender<TimerUpdate>,
    /// Latest snapshot
    snapshot_tx: watch::Sender<Option<TimerState>>,
}

impl TimerEngine {
    /// Creates an engine without state.
    pub fn new(settings: Settings, update_tx: mpsc::UnboundedSender<TimerUpdate>) -> Self {
        let (snapshot_tx, _) = watch::channel(None);
        Self {
            settings,
            state: None,
            update_tx,
            snapshot_tx,
        }
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> Option<TimerState> {
        self.state.clone()
    }

    /// Returns the configuration the engine is running with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns true while the cadence should be active.
    pub fn is_running(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.is_running)
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<TimerState>> {
        self.snapshot_tx.subscribe()
    }

    /// Recreates the state from `initial_state` or from fresh defaults.
    ///
    /// # Errors
    ///
    /// Returns `UpdatesClosed` if the update receiver was dropped.
    pub fn init(
        &mut self,
        settings: Settings,
        initial_state: Option<TimerState>,
    ) -> Result<(), EngineError> {
        let state = match initial_state {
            Some(snapshot) => snapshot.restored(&settings),
            None => TimerState::new(&settings),
        };
        debug!("Engine init: {:?}", state);
        self.settings = settings;
        self.state = Some(state);
        self.publish(Effects::default())
    }

    /// Marks the state running, initializing it first if needed.
    ///
    /// The settings replace the stored configuration without touching the
    /// current state. Starting a running or finished session changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `UpdatesClosed` if the update receiver was dropped.
    pub fn start(&mut self, settings: Settings) -> Result<(), EngineError> {
        let state = self
            .state
            .get_or_insert_with(|| TimerState::new(&settings));

        if state.is_finished {
            debug!("Start ignored: session finished");
        } else if !state.is_running {
            state.is_running = true;
            debug!("Engine started at {}s remaining", state.remaining_seconds);
        }
        self.settings = settings;
        self.publish(Effects::default())
    }

    /// Clears the running flag.
    ///
    /// # Errors
    ///
    /// Returns `UpdatesClosed` if the update receiver was dropped.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        if state.is_running {
            state.is_running = false;
            debug!("Engine stopped at {}s remaining", state.remaining_seconds);
        }
        self.publish(Effects::default())
    }

    /// Rebuilds the state at the first work cycle of the first set.
    ///
    /// # Errors
    ///
    /// Returns `UpdatesClosed` if the update receiver was dropped.
    pub fn reset(&mut self, settings: Settings) -> Result<(), EngineError> {
        self.state = Some(TimerState::new(&settings));
        self.settings = settings;
        debug!("Engine reset");
        self.publish(Effects::default())
    }

    /// Advances the running state by one second.
    ///
    /// Does nothing when the state is absent or not running.
    ///
    /// # Errors
    ///
    /// Returns `UpdatesClosed` if the update receiver was dropped.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        let Some(state) = self.state.as_mut().filter(|s| s.is_running) else {
            return Ok(());
        };
        let effects = machine::advance(state, &self.settings);
        self.publish(effects)
    }

    /// Applies one command.
    ///
    /// # Errors
    ///
    /// Returns `UpdatesClosed` if the update receiver was dropped.
    pub fn handle(&mut self, command: EngineCommand) -> Result<(), EngineError> {
        match command {
            EngineCommand::Init {
                settings,
                initial_state,
            } => self.init(settings, initial_state),
            EngineCommand::Start { settings } => self.start(settings),
            EngineCommand::Stop => self.stop(),
            EngineCommand::Reset { settings } => self.reset(settings),
        }
    }

    fn publish(&self, effects: Effects) -> Result<(), EngineError> {
        let Some(state) = self.state.clone() else {
            return Ok(());
        };
        self.snapshot_tx.send_replace(Some(state.clone()));
        self.update_tx
            .send(TimerUpdate {
                state,
                sound: effects.sound,
                notification: effects.notification,
            })
            .map_err(|_| EngineError::UpdatesClosed)
    }

    /// Runs the engine loop until every command sender is dropped.
    ///
    /// Commands are polled before ticks, so an acknowledged stop or reset
    /// is never followed by a tick from the previous cadence. Missed ticks
    /// are delivered in a burst to keep the countdown accurate when the
    /// executor stalls.
    async fn run(mut self, mut commands: mpsc::Receiver<Envelope>) {
        let mut ticker: Option<Interval> = None;

        loop {
            tokio::select! {
                biased;

                envelope = commands.recv() => {
                    let Some(Envelope { command, ack }) = envelope else {
                        debug!("Command channel closed, engine exiting");
                        break;
                    };
                    let result = self.handle(command);
                    let closed = result.is_err();
                    let _ = ack.send(result.map(|()| self.state()));
                    if closed {
                        warn!("Timer updates are no longer received, engine exiting");
                        break;
                    }
                }

                _ = next_tick(&mut ticker) => {
                    if let Err(e) = self.tick() {
                        warn!("Engine exiting: {}", e);
                        break;
                    }
                }
            }

            if self.is_running() {
                ticker.get_or_insert_with(new_ticker);
            } else {
                ticker = None;
            }
        }
    }
}

fn new_ticker() -> Interval {
    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

// ============================================================================
// EngineHandle
// ============================================================================

/// Cloneable handle for commanding a spawned engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Envelope>,
    snapshot: watch::Receiver<Option<TimerState>>,
}

impl EngineHandle {
    async fn send(&self, command: EngineCommand) -> Result<Option<TimerState>, EngineError> {
        let (ack, response) = oneshot::channel();
        self.commands
            .send(Envelope { command, ack })
            .await
            .map_err(|_| EngineError::Closed)?;
        response.await.map_err(|_| EngineError::Closed)?
    }

    /// Initializes the engine, optionally from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Closed` if the engine task is gone.
    pub async fn init(
        &self,
        settings: Settings,
        initial_state: Option<TimerState>,
    ) -> Result<TimerState, EngineError> {
        self.send(EngineCommand::Init {
            settings,
            initial_state,
        })
        .await?
        .ok_or(EngineError::NotInitialized)
    }

    /// Starts the cadence.
    ///
    /// # Errors
    ///
    /// Returns `Closed` if the engine task is gone.
    pub async fn start(&self, settings: Settings) -> Result<TimerState, EngineError> {
        self.send(EngineCommand::Start { settings })
            .await?
            .ok_or(EngineError::NotInitialized)
    }

    /// Halts the cadence. Returns None if the engine has no state yet.
    ///
    /// # Errors
    ///
    /// Returns `Closed` if the engine task is gone.
    pub async fn stop(&self) -> Result<Option<TimerState>, EngineError> {
        self.send(EngineCommand::Stop).await
    }

    /// Rebuilds the state from `settings`.
    ///
    /// # Errors
    ///
    /// Returns `Closed` if the engine task is gone.
    pub async fn reset(&self, settings: Settings) -> Result<TimerState, EngineError> {
        self.send(EngineCommand::Reset { settings })
            .await?
            .ok_or(EngineError::NotInitialized)
    }

    /// Returns the latest snapshot.
    pub fn snapshot(&self) -> Option<TimerState> {
        self.snapshot.borrow().clone()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<TimerState>> {
        self.snapshot.clone()
    }

    /// Returns true once the engine task has exited.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// Spawns an engine task on the current runtime.
///
/// Returns the handle, the update stream and the task handle. The task
/// exits when every handle is dropped.
pub fn spawn(
    settings: Settings,
) -> (
    EngineHandle,
    mpsc::UnboundedReceiver<TimerUpdate>,
    JoinHandle<()>,
) {
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);

    let engine = TimerEngine::new(settings, update_tx);
    let handle = EngineHandle {
        commands: command_tx,
        snapshot: engine.subscribe(),
    };
    let task = tokio::spawn(engine.run(command_rx));

    (handle, update_rx, task)
}

// ============================================================================
// Tests
// ============================================================================
