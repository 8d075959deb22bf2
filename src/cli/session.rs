//! Interactive timer session.
//!
//! Reads one-letter commands from stdin, drives a [`TimerController`] and
//! re-renders the current view on every snapshot change. Switching view
//! hands the snapshot over to a fresh controller.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use super::commands::RunArgs;
use super::display::{Display, View};
use crate::controller::TimerController;
use crate::notification::{DesktopNotifier, NotificationSender};
use crate::settings::{SettingKey, SettingsStore};
use crate::sound::{try_create_player, SilentSoundPlayer, SoundLibrary, SoundPlayer};

/// A line of user input during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Toggle,
    Reset,
    SwitchView,
    Mute,
    /// Change one setting; anything but volume is applied through a reset
    Set {
        key: String,
        value: String,
    },
    Quit,
    Unknown(String),
}

impl SessionInput {
    /// Parses one input line. An empty line toggles.
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        match command.as_str() {
            "" | "t" | "space" | "toggle" => SessionInput::Toggle,
            "r" | "reset" => SessionInput::Reset,
            "f" | "fullscreen" | "view" => SessionInput::SwitchView,
            "m" | "mute" => SessionInput::Mute,
            "s" | "set" => match (words.next(), words.next(), words.next()) {
                (Some(key), Some(value), None) => SessionInput::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                _ => SessionInput::Unknown(line.trim().to_string()),
            },
            "q" | "quit" | "exit" => SessionInput::Quit,
            _ => SessionInput::Unknown(line.trim().to_string()),
        }
    }
}

/// Runs an interactive session until `q`, end of input or Ctrl-C.
///
/// Rejected or unsaved settings changes are logged and the session goes on.
///
/// # Errors
///
/// Returns an error if the engine fails or stdin cannot be read.
pub async fn run_session(mut store: SettingsStore, args: RunArgs) -> Result<()> {
    let settings = store.settings().clone();
    let sound = create_sound_player(&args, settings.volume);
    let notifier: Arc<dyn NotificationSender> = if args.no_notifications {
        Arc::new(DesktopNotifier::denied())
    } else {
        Arc::new(DesktopNotifier::new())
    };

    let mut view = if args.fullscreen {
        View::Fullscreen
    } else {
        View::Normal
    };
    let mut controller = TimerController::new(settings, sound.clone(), notifier.clone())
        .await
        .context("Failed to start the timer engine")?;
    let mut snapshots = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("Session started");
    render(&controller, view)?;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!("Timer engine stopped");
                    break;
                }
            }

            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    debug!("End of input");
                    break;
                };
                match SessionInput::parse(&line) {
                    SessionInput::Toggle => controller.toggle().await?,
                    SessionInput::Reset => {
                        controller.reset().await?;
                    }
                    SessionInput::SwitchView => {
                        let settings = controller.settings().clone();
                        let snapshot = controller.handoff().await?;
                        controller = TimerController::resume(
                            settings,
                            snapshot,
                            sound.clone(),
                            notifier.clone(),
                        )
                        .await
                        .context("Failed to switch view")?;
                        snapshots = controller.subscribe();
                        view = view.toggled();
                    }
                    SessionInput::Mute => match store.toggle_mute() {
                        Ok(volume) => controller.set_volume(volume),
                        Err(e) => warn!("Mute not changed: {}", e),
                    },
                    SessionInput::Set { key, value } => {
                        let volume_only = matches!(key.parse::<SettingKey>(), Ok(SettingKey::Volume));
                        match store.update(&key, &value) {
                            Ok(settings) if volume_only => controller.set_volume(settings.volume),
                            Ok(settings) => {
                                let settings = settings.clone();
                                controller.apply_settings(settings).await?;
                            }
                            Err(e) => warn!("Setting not changed: {}", e),
                        }
                    }
                    SessionInput::Quit => break,
                    SessionInput::Unknown(input) => warn!("Unknown command: {}", input),
                }
            }

            _ = &mut ctrl_c => {
                debug!("Interrupted");
                break;
            }
        }

        render(&controller, view)?;
    }

    sound.stop_all();
    info!("Session ended");
    Ok(())
}

fn render(controller: &TimerController, view: View) -> Result<()> {
    let Some(state) = controller.snapshot() else {
        return Ok(());
    };
    let frame = Display::render(
        &state,
        controller.settings(),
        controller.progress_percent(),
        view,
    );
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(frame.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write to the terminal")
}

fn create_sound_player(args: &RunArgs, volume: u8) -> Arc<dyn SoundPlayer> {
    if args.no_sound {
        return Arc::new(SilentSoundPlayer::new(volume));
    }

    let library = args
        .sounds
        .clone()
        .map_or_else(SoundLibrary::from_home, SoundLibrary::new);
    let missing = library.missing();
    if !missing.is_empty() {
        debug!("Using synthesized tones for {} cue(s)", missing.len());
    }

    try_create_player(library, volume)
        .map(|player| player as Arc<dyn SoundPlayer>)
        .unwrap_or_else(|| Arc::new(SilentSoundPlayer::new(volume)))
}
