//! Sound player implementation using rodio.
//!
//! rodio's `OutputStream` is not `Send`, so the stream lives on a dedicated
//! audio thread and `RodioSoundPlayer` talks to it over a
//! crossbeam channel. Only one cue plays at a time: starting a cue stops
//! the previous one.

use std::fs::File;
use std::io::BufReader;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{SoundLibrary, SoundSource};
use super::SoundPlayer;
use crate::types::SoundId;

/// Amplitude of synthesized tones relative to full scale.
const TONE_AMPLITUDE: f32 = 0.25;

enum AudioCommand {
    Play { source: SoundSource, volume: f32 },
    StopAll,
    SetVolume(f32),
}

/// A sound player that uses rodio for audio playback.
///
/// The player is `Send + Sync` and can be shared across threads using `Arc`.
/// Playback is non-blocking; cues keep playing in the background.
pub struct RodioSoundPlayer {
    commands: Sender<AudioCommand>,
    library: SoundLibrary,
    volume: AtomicU8,
}

impl RodioSoundPlayer {
    /// Creates a player and its audio thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available or the audio thread cannot be started.
    pub fn new(library: SoundLibrary, volume: u8) -> Result<Self, SoundError> {
        let (commands, receiver) = crossbeam_channel::unbounded();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);

        thread::Builder::new()
            .name("zen-pomodoro-audio".to_string())
            .spawn(move || audio_thread(receiver, ready_tx))
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?
            .map_err(SoundError::DeviceNotAvailable)?;

        debug!("Audio output stream initialized");

        Ok(Self {
            commands,
            library,
            volume: AtomicU8::new(volume.min(100)),
        })
    }

    /// Returns the library cues are resolved from.
    #[must_use]
    pub fn library(&self) -> &SoundLibrary {
        &self.library
    }

    fn send(&self, command: AudioCommand) -> Result<(), SoundError> {
        self.commands
            .send(command)
            .map_err(|_| SoundError::PlaybackError("audio thread stopped".to_string()))
    }
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, sound: SoundId) -> Result<(), SoundError> {
        let volume = self.volume();
        if volume == 0 {
            debug!("Muted, skipping {}", sound);
            return Ok(());
        }

        let source = self.library.resolve(sound);
        debug!("Playing {} from {:?}", sound, source);
        self.send(AudioCommand::Play {
            source,
            volume: scale(volume),
        })
    }

    fn stop_all(&self) {
        if let Err(e) = self.send(AudioCommand::StopAll) {
            warn!("Failed to stop sounds: {}", e);
        }
    }

    fn set_volume(&self, volume: u8) {
        let volume = volume.min(100);
        self.volume.store(volume, Ordering::Relaxed);
        if let Err(e) = self.send(AudioCommand::SetVolume(scale(volume))) {
            warn!("Failed to set volume: {}", e);
        }
    }

    fn volume(&self) -> u8 {
        self.volume.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("library", &self.library)
            .field("volume", &self.volume())
            .finish_non_exhaustive()
    }
}

/// Maps a 0-100 volume to a rodio gain.
fn scale(volume: u8) -> f32 {
    f32::from(volume.min(100)) / 100.0
}

fn audio_thread(commands: Receiver<AudioCommand>, ready: Sender<Result<(), String>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    let mut current: Option<Sink> = None;
    for command in commands {
        match command {
            AudioCommand::Play { source, volume } => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
                match start(&handle, &source, volume) {
                    Ok(sink) => current = Some(sink),
                    Err(e) => warn!("Failed to play {}: {}", source.sound(), e),
                }
            }
            AudioCommand::StopAll => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
            }
            AudioCommand::SetVolume(volume) => {
                if let Some(sink) = current.as_ref() {
                    sink.set_volume(volume);
                }
            }
        }
    }
    debug!("Audio thread exiting");
}

/// Starts a source on a new sink, falling back to the cue's tone when the
/// file cannot be used.
fn start(
    handle: &OutputStreamHandle,
    source: &SoundSource,
    volume: f32,
) -> Result<Sink, SoundError> {
    let sink = Sink::try_new(handle).map_err(|e| SoundError::StreamError(e.to_string()))?;
    sink.set_volume(volume);

    match source {
        SoundSource::File { sound, path } => match decode(path) {
            Ok(decoder) => sink.append(decoder),
            Err(e) if e.should_fallback_to_tone() => {
                warn!("{}, playing tone for {} instead", e, sound);
                append_tone(&sink, &SoundSource::tone(*sound));
            }
            Err(e) => return Err(e),
        },
        SoundSource::Tone { .. } => append_tone(&sink, source),
    }
    Ok(sink)
}

fn decode(path: &std::path::Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
}

fn append_tone(sink: &Sink, source: &SoundSource) {
    if let SoundSource::Tone {
        frequency_hz,
        duration,
        ..
    } = source
    {
        sink.append(
            SineWave::new(*frequency_hz)
                .take_duration(*duration)
                .amplify(TONE_AMPLITUDE),
        );
    }
}

/// Creates a rodio player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player(library: SoundLibrary, volume: u8) -> Option<Arc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new(library, volume) {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
