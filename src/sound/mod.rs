//! Sound playback system for the Pomodoro Timer.
//!
//! This module provides the audio cues played at phase transitions:
//!
//! - Per-cue sound files with synthesized tone fallback
//! - Non-blocking playback on a dedicated audio thread
//! - Volume control, muted at 0
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   SoundPlayer    │ ← trait used by the controller
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ RodioSoundPlayer │────▶│   audio thread   │
//! │                  │     │ (OutputStream)   │
//! └────────┬─────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundLibrary   │────▶│ <dir>/<cue>.mp3  │
//! │                  │     ├──────────────────┤
//! │                  │────▶│ sine tone        │
//! └──────────────────┘     │  (fallback)      │
//!                          └──────────────────┘
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::debug;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{default_sound_dir, SoundLibrary, SoundSource, DEFAULT_SOUND_DIR};

use crate::types::SoundId;

/// Trait for cue playback implementations.
///
/// Implementations are shared between tasks, so they must be `Send + Sync`.
pub trait SoundPlayer: Send + Sync {
    /// Plays a cue, stopping any cue already playing.
    ///
    /// Non-blocking. Does nothing while muted.
    ///
    /// # Errors
    ///
    /// Returns an error if playback cannot be started.
    fn play(&self, sound: SoundId) -> Result<(), SoundError>;

    /// Stops every cue in flight.
    fn stop_all(&self);

    /// Sets the volume (0-100, 0 mutes).
    fn set_volume(&self, volume: u8);

    /// Returns the current volume.
    fn volume(&self) -> u8;

    /// Returns true while the volume is 0.
    fn is_muted(&self) -> bool {
        self.volume() == 0
    }
}

/// A player without audio output.
///
/// Used when no audio device is available or sound is switched off.
#[derive(Debug, Default)]
pub struct SilentSoundPlayer {
    volume: AtomicU8,
}

impl SilentSoundPlayer {
    #[must_use]
    pub fn new(volume: u8) -> Self {
        Self {
            volume: AtomicU8::new(volume.min(100)),
        }
    }
}

impl SoundPlayer for SilentSoundPlayer {
    fn play(&self, sound: SoundId) -> Result<(), SoundError> {
        debug!("No audio output, skipping {}", sound);
        Ok(())
    }

    fn stop_all(&self) {}

    fn set_volume(&self, volume: u8) {
        self.volume.store(volume.min(100), Ordering::Relaxed);
    }

    fn volume(&self) -> u8 {
        self.volume.load(Ordering::Relaxed)
    }
}

/// Mock sound player for testing.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundId>>,
    volume: AtomicU8,
    should_fail: AtomicBool,
    stop_all_calls: AtomicUsize,
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            volume: AtomicU8::new(75),
            should_fail: AtomicBool::new(false),
            stop_all_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundId> {
        self.play_calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn count_of(&self, sound: SoundId) -> usize {
        self.play_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|s| **s == sound)
            .count()
    }

    #[must_use]
    pub fn stop_all_count(&self) -> usize {
        self.stop_all_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, sound: SoundId) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if self.is_muted() {
            return Ok(());
        }
        self.play_calls.lock().unwrap().push(sound);
        Ok(())
    }

    fn stop_all(&self) {
        self.stop_all_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn set_volume(&self, volume: u8) {
        self.volume.store(volume.min(100), Ordering::SeqCst);
    }

    fn volume(&self) -> u8 {
        self.volume.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _: fn(SoundLibrary, u8) -> Result<RodioSoundPlayer, SoundError> = RodioSoundPlayer::new;
        let _: fn(SoundId) -> SoundSource = SoundSource::tone;
        let _: fn() -> SoundLibrary = SoundLibrary::tones_only;
    }

    mod mock_player_tests {
        use super::*;

        #[test]
        fn test_records_calls() {
            let player = MockSoundPlayer::new();
            player.play(SoundId::Startup).unwrap();
            player.play(SoundId::Pause).unwrap();

            assert_eq!(player.play_count(), 2);
            assert_eq!(
                player.get_play_calls(),
                vec![SoundId::Startup, SoundId::Pause]
            );
            assert_eq!(player.count_of(SoundId::Pause), 1);
        }

        #[test]
        fn test_muted_skips_calls() {
            let player = MockSoundPlayer::new();
            player.set_volume(0);

            assert!(player.is_muted());
            player.play(SoundId::Complete).unwrap();
            assert_eq!(player.play_count(), 0);
        }

        #[test]
        fn test_should_fail() {
            let player = MockSoundPlayer::new();
            player.set_should_fail(true);

            assert!(player.play(SoundId::Complete).is_err());
        }

        #[test]
        fn test_stop_all_counted() {
            let player = MockSoundPlayer::new();
            player.stop_all();
            player.stop_all();
            assert_eq!(player.stop_all_count(), 2);
        }
    }

    mod silent_player_tests {
        use super::*;

        #[test]
        fn test_play_succeeds() {
            let player = SilentSoundPlayer::new(75);
            assert!(player.play(SoundId::WorkStart).is_ok());
        }

        #[test]
        fn test_volume_round_trip() {
            let player = SilentSoundPlayer::new(120);
            assert_eq!(player.volume(), 100);

            player.set_volume(0);
            assert!(player.is_muted());
        }
    }
}
