//! Sound source resolution.
//!
//! Each cue is loaded from its file in a sound directory when present and
//! falls back to a short synthesized tone otherwise.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::SoundId;

/// Sound directory relative to the home directory.
pub const DEFAULT_SOUND_DIR: &str = ".zen-pomodoro/sounds";

/// Represents the source of a cue to be played.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// The cue this file plays.
        sound: SoundId,
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// A sine tone synthesized at playback time.
    Tone {
        /// The cue this tone stands in for.
        sound: SoundId,
        /// Tone frequency in Hz.
        frequency_hz: f32,
        /// Tone length.
        duration: Duration,
    },
}

impl SoundSource {
    /// Creates a file source.
    #[must_use]
    pub fn file(sound: SoundId, path: impl Into<PathBuf>) -> Self {
        Self::File {
            sound,
            path: path.into(),
        }
    }

    /// Creates the fallback tone of a cue.
    #[must_use]
    pub fn tone(sound: SoundId) -> Self {
        let (frequency_hz, millis) = match sound {
            SoundId::WorkStart => (880.0, 300),
            SoundId::RestStart => (660.0, 300),
            SoundId::LongBreak => (523.25, 500),
            SoundId::Complete => (1046.5, 700),
            SoundId::Startup => (784.0, 250),
            SoundId::WorkWarning => (987.77, 150),
            SoundId::RestWarning => (739.99, 150),
            SoundId::Pause => (440.0, 200),
            SoundId::Unpause => (587.33, 200),
        };
        Self::Tone {
            sound,
            frequency_hz,
            duration: Duration::from_millis(millis),
        }
    }

    /// Returns the cue of this source.
    #[must_use]
    pub fn sound(&self) -> SoundId {
        match self {
            Self::File { sound, .. } | Self::Tone { sound, .. } => *sound,
        }
    }

    /// Returns true if this source is a file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Tone { .. } => None,
        }
    }
}

/// Maps cues to sources inside an optional sound directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundLibrary {
    dir: Option<PathBuf>,
}

impl SoundLibrary {
    /// Creates a library reading cue files from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Creates a library that only synthesizes tones.
    #[must_use]
    pub fn tones_only() -> Self {
        Self { dir: None }
    }

    /// Creates a library for `~/.zen-pomodoro/sounds`, or tones only if the
    /// home directory is unknown.
    #[must_use]
    pub fn from_home() -> Self {
        default_sound_dir().map_or_else(Self::tones_only, Self::new)
    }

    /// Returns the sound directory, if any.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Resolves the source of a cue.
    #[must_use]
    pub fn resolve(&self, sound: SoundId) -> SoundSource {
        self.dir
            .as_ref()
            .map(|dir| dir.join(sound.file_name()))
            .filter(|path| path.is_file())
            .map_or_else(|| SoundSource::tone(sound), |path| SoundSource::file(sound, path))
    }

    /// Returns the cues whose file is absent from the directory.
    #[must_use]
    pub fn missing(&self) -> Vec<SoundId> {
        SoundId::ALL
            .into_iter()
            .filter(|sound| !self.resolve(*sound).is_file())
            .collect()
    }
}

/// Returns `~/.zen-pomodoro/sounds`.
#[must_use]
pub fn default_sound_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_SOUND_DIR))
}
