//! JSON-file persistence for [`Settings`].
//!
//! The store reads the file once when opened and writes it back after every
//! accepted change. A missing file yields the defaults; a legacy
//! `soundEnabled` flag is migrated to a volume on load.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{SettingKey, Settings, SettingsError};

/// Settings file location relative to the home directory.
pub const DEFAULT_SETTINGS_PATH: &str = ".zen-pomodoro/settings.json";

/// Volume restored by unmuting when no earlier non-zero volume is known.
pub const MUTE_RESTORE_VOLUME: u8 = 75;

const LEGACY_SOUND_KEY: &str = "soundEnabled";

/// Settings backed by a JSON file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
    /// Last non-zero volume, restored by `toggle_mute`
    last_volume: u8,
}

impl SettingsStore {
    /// Returns `~/.zen-pomodoro/settings.json`.
    ///
    /// # Errors
    ///
    /// Returns `HomeNotFound` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let home = dirs::home_dir().ok_or(SettingsError::HomeNotFound)?;
        Ok(home.join(DEFAULT_SETTINGS_PATH))
    }

    /// Opens the store at `path`, loading the file if it exists.
    ///
    /// A malformed document is logged and replaced by the defaults in
    /// memory; the file itself is only rewritten on the next change.
    /// Out-of-range or mistyped fields fall back to their defaults
    /// individually.
    ///
    /// # Errors
    ///
    /// Returns `ReadFailed` if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(SettingsError::ReadFailed(format!("{}: {}", path.display(), e))),
        };

        let settings = match contents {
            None => {
                debug!("No settings file at {}, using defaults", path.display());
                Settings::default()
            }
            Some(contents) => match parse_document(&contents) {
                Ok((settings, migrated)) => {
                    if migrated {
                        info!("Migrated legacy {} flag in {}", LEGACY_SOUND_KEY, path.display());
                        if let Err(e) = write_settings(&path, &settings) {
                            warn!("Failed to write migrated settings: {}", e);
                        }
                    }
                    settings
                }
                Err(e) => {
                    warn!("{}; using defaults", e);
                    Settings::default()
                }
            },
        };

        Ok(Self::with_settings(path, settings))
    }

    /// Creates a store holding `settings` without touching the file.
    pub fn with_settings(path: impl Into<PathBuf>, settings: Settings) -> Self {
        let last_volume = if settings.volume > 0 {
            settings.volume
        } else {
            MUTE_RESTORE_VOLUME
        };
        Self {
            path: path.into(),
            settings,
            last_volume,
        }
    }

    /// Returns the file path of this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Updates one setting by name from its textual value and saves.
    ///
    /// A rejected value is logged and the previous value is kept.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown key or a bad value, or
    /// `WriteFailed` if the accepted change cannot be saved.
    pub fn update(&mut self, key: &str, raw: &str) -> Result<&Settings, SettingsError> {
        let previous = self.settings.clone();
        let result = key
            .parse::<SettingKey>()
            .and_then(|key| self.settings.update(key, raw).map(|()| key));

        match result {
            Ok(key) => {
                debug!("Setting {} = {}", key, self.settings.get(key));
                let last_volume = self.last_volume;
                if key == SettingKey::Volume && self.settings.volume > 0 {
                    self.last_volume = self.settings.volume;
                }
                self.commit(previous, last_volume)?;
                Ok(&self.settings)
            }
            Err(e) => {
                warn!("Rejected settings update: {}", e);
                Err(e)
            }
        }
    }

    /// Sets the volume and saves.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` above 100 or `WriteFailed` if saving fails.
    pub fn set_volume(&mut self, volume: u8) -> Result<(), SettingsError> {
        self.update(SettingKey::Volume.as_str(), &volume.to_string())
            .map(|_| ())
    }

    /// Switches between muted and the last non-zero volume, then saves.
    ///
    /// Returns the new volume.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if saving fails.
    pub fn toggle_mute(&mut self) -> Result<u8, SettingsError> {
        let previous = self.settings.clone();
        let last_volume = self.last_volume;
        if self.settings.volume > 0 {
            self.last_volume = self.settings.volume;
            self.settings.volume = 0;
        } else {
            self.settings.volume = self.last_volume;
        }
        self.commit(previous, last_volume)?;
        Ok(self.settings.volume)
    }

    /// Restores the default settings and saves.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if saving fails.
    pub fn reset_to_defaults(&mut self) -> Result<(), SettingsError> {
        let previous = std::mem::take(&mut self.settings);
        let last_volume = self.last_volume;
        self.last_volume = self.settings.volume;
        self.commit(previous, last_volume)
    }

    /// Writes the current settings to the file, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if the directory or file cannot be written.
    pub fn save(&self) -> Result<(), SettingsError> {
        write_settings(&self.path, &self.settings)
    }

    /// Saves the in-memory change, restoring `previous` if the write fails.
    fn commit(&mut self, previous: Settings, last_volume: u8) -> Result<(), SettingsError> {
        if let Err(e) = self.save() {
            warn!("{}; change discarded", e);
            self.settings = previous;
            self.last_volume = last_volume;
            return Err(e);
        }
        Ok(())
    }
}

/// Rewrites a legacy `soundEnabled` flag into a volume.
///
/// `true` becomes volume 75 and `false` volume 0, replacing any `volume`
/// already present; the flag is removed. Returns true if the document
/// changed.
pub fn migrate(document: &mut Value) -> bool {
    let Some(object) = document.as_object_mut() else {
        return false;
    };
    let Some(legacy) = object.remove(LEGACY_SOUND_KEY) else {
        return false;
    };

    let volume = if legacy.as_bool().unwrap_or(true) {
        MUTE_RESTORE_VOLUME
    } else {
        0
    };
    object.insert(SettingKey::Volume.as_str().to_string(), Value::from(volume));
    true
}

fn parse_document(contents: &str) -> Result<(Settings, bool), SettingsError> {
    let mut document: Value =
        serde_json::from_str(contents).map_err(|e| SettingsError::Malformed(e.to_string()))?;
    let migrated = migrate(&mut document);
    let object = document
        .as_object()
        .ok_or_else(|| SettingsError::Malformed("expected a JSON object".to_string()))?;

    let mut settings = Settings::default();
    for key in SettingKey::ALL {
        let Some(value) = object.get(key.as_str()) else {
            continue;
        };
        let accepted = match value.as_i64() {
            Some(number) => settings.update(key, &number.to_string()),
            None => Err(SettingsError::NotANumber {
                key,
                value: value.to_string(),
            }),
        };
        if let Err(e) = accepted {
            warn!("Ignoring stored value ({}), using default {}", e, settings.get(key));
        }
    }
    Ok((settings, migrated))
}

fn write_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::WriteFailed(format!("{}: {}", parent.display(), e)))?;
        }
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SettingsError::WriteFailed(e.to_string()))?;
    fs::write(path, json)
        .map_err(|e| SettingsError::WriteFailed(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::open(dir.path().join("settings.json")).unwrap()
    }

    mod migrate_tests {
        use super::*;

        #[test]
        fn test_sound_enabled_true_becomes_default_volume() {
            let mut doc = json!({ "workTime": 25, "soundEnabled": true });
            assert!(migrate(&mut doc));
            assert_eq!(doc, json!({ "workTime": 25, "volume": 75 }));
        }

        #[test]
        fn test_sound_enabled_false_becomes_muted() {
            let mut doc = json!({ "soundEnabled": false });
            assert!(migrate(&mut doc));
            assert_eq!(doc, json!({ "volume": 0 }));
        }

        #[test]
        fn test_legacy_flag_overrides_existing_volume() {
            let mut doc = json!({ "soundEnabled": false, "volume": 40 });
            assert!(migrate(&mut doc));
            assert_eq!(doc, json!({ "volume": 0 }));

            let mut doc = json!({ "soundEnabled": true, "volume": 10 });
            assert!(migrate(&mut doc));
            assert_eq!(doc, json!({ "volume": 75 }));
        }

        #[test]
        fn test_document_without_legacy_flag_is_untouched() {
            let mut doc = json!({ "volume": 10 });
            assert!(!migrate(&mut doc));
            assert_eq!(doc, json!({ "volume": 10 }));
        }
    }

    mod store_tests {
        use super::*;

        #[test]
        fn test_open_missing_file_uses_defaults() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);

            assert_eq!(store.settings(), &Settings::default());
            assert!(!store.path().exists());
        }

        #[test]
        fn test_open_reads_partial_document() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("settings.json");
            fs::write(&path, r#"{"workTime": 25, "totalSets": 1}"#).unwrap();

            let store = SettingsStore::open(&path).unwrap();
            assert_eq!(store.settings().work_time, 25);
            assert_eq!(store.settings().total_sets, 1);
            assert_eq!(store.settings().rest_time, 5);
        }

        #[test]
        fn test_open_migrates_and_writes_back() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("settings.json");
            fs::write(&path, r#"{"soundEnabled": false}"#).unwrap();

            let store = SettingsStore::open(&path).unwrap();
            assert_eq!(store.settings().volume, 0);

            let written = fs::read_to_string(&path).unwrap();
            assert!(!written.contains("soundEnabled"));
            assert!(written.contains("\"volume\": 0"));
        }

        #[test]
        fn test_open_malformed_uses_defaults() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("settings.json");
            fs::write(&path, "not json").unwrap();

            let store = SettingsStore::open(&path).unwrap();
            assert_eq!(store.settings(), &Settings::default());
        }

        #[test]
        fn test_open_replaces_out_of_range_fields() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("settings.json");
            fs::write(&path, r#"{"workSeconds": 90, "workCycles": 0, "restTime": 3}"#).unwrap();

            let store = SettingsStore::open(&path).unwrap();
            assert_eq!(store.settings().work_seconds, 0);
            assert_eq!(store.settings().work_cycles, 4);
            assert_eq!(store.settings().rest_time, 3);
        }

        #[test]
        fn test_open_keeps_valid_fields_next_to_mistyped_ones() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("settings.json");
            fs::write(
                &path,
                r#"{"workTime": 25, "totalSets": 3, "volume": 300, "restSeconds": -1, "restTime": "ten", "longBreakTime": 12.5}"#,
            )
            .unwrap();

            let store = SettingsStore::open(&path).unwrap();
            let settings = store.settings();
            assert_eq!(settings.work_time, 25);
            assert_eq!(settings.total_sets, 3);
            assert_eq!(settings.volume, 75);
            assert_eq!(settings.rest_seconds, 0);
            assert_eq!(settings.rest_time, 5);
            assert_eq!(settings.long_break_time, 30);
        }

        #[test]
        fn test_open_non_object_uses_defaults() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("settings.json");
            fs::write(&path, "[1, 2, 3]").unwrap();

            let store = SettingsStore::open(&path).unwrap();
            assert_eq!(store.settings(), &Settings::default());
        }

        #[test]
        fn test_failed_save_rolls_back() {
            let dir = TempDir::new().unwrap();
            // the parent is a regular file, so every write fails
            let blocker = dir.path().join("blocker");
            fs::write(&blocker, "").unwrap();
            let mut store = SettingsStore::with_settings(
                blocker.join("settings.json"),
                Settings {
                    volume: 40,
                    ..Settings::default()
                },
            );

            let err = store.update("workTime", "20").unwrap_err();
            assert!(err.is_storage_error());
            assert_eq!(store.settings().work_time, 45);

            assert!(store.toggle_mute().is_err());
            assert_eq!(store.settings().volume, 40);

            store.settings.work_cycles = 7;
            assert!(store.reset_to_defaults().is_err());
            assert_eq!(store.settings().work_cycles, 7);
            assert_eq!(store.settings().volume, 40);
        }

        #[test]
        fn test_update_saves_accepted_value() {
            let dir = TempDir::new().unwrap();
            let mut store = store_in(&dir);

            let settings = store.update("workSeconds", "30").unwrap();
            assert_eq!(settings.work_seconds, 30);

            let reopened = store_in(&dir);
            assert_eq!(reopened.settings().work_seconds, 30);
        }

        #[test]
        fn test_update_rejects_and_retains() {
            let dir = TempDir::new().unwrap();
            let mut store = store_in(&dir);

            assert!(store.update("volume", "150").is_err());
            assert!(store.update("workTime", "soon").is_err());
            assert!(store.update("nope", "1").is_err());
            assert_eq!(store.settings(), &Settings::default());
            assert!(!store.path().exists());
        }

        #[test]
        fn test_toggle_mute_restores_last_volume() {
            let dir = TempDir::new().unwrap();
            let mut store = store_in(&dir);
            store.set_volume(40).unwrap();

            assert_eq!(store.toggle_mute().unwrap(), 0);
            assert!(store.settings().is_muted());
            assert_eq!(store.toggle_mute().unwrap(), 40);
        }

        #[test]
        fn test_toggle_mute_from_zero_uses_default_volume() {
            let dir = TempDir::new().unwrap();
            let mut store = SettingsStore::with_settings(
                dir.path().join("settings.json"),
                Settings {
                    volume: 0,
                    ..Settings::default()
                },
            );

            assert_eq!(store.toggle_mute().unwrap(), MUTE_RESTORE_VOLUME);
        }

        #[test]
        fn test_reset_to_defaults() {
            let dir = TempDir::new().unwrap();
            let mut store = store_in(&dir);
            store.update("totalSets", "5").unwrap();

            store.reset_to_defaults().unwrap();
            assert_eq!(store.settings(), &Settings::default());
            assert_eq!(store_in(&dir).settings(), &Settings::default());
        }

        #[test]
        fn test_save_creates_parent_directory() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("nested").join("settings.json");
            let store = SettingsStore::with_settings(&path, Settings::default());

            store.save().unwrap();
            assert!(path.exists());
        }
    }
}
