//! Timer settings.
//!
//! Settings hold the duration and cycle configuration plus the cue volume.
//! The engine only ever reads them; changes go through [`Settings::update`]
//! (one key at a time, validated) and reach a running session only through
//! a reset.

mod error;
mod store;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error::SettingsError;
pub use store::{migrate, SettingsStore, DEFAULT_SETTINGS_PATH, MUTE_RESTORE_VOLUME};

/// Largest accepted minutes component.
pub const MAX_MINUTES: i64 = 1440;

/// Largest accepted number of cycles per set or sets per session.
pub const MAX_COUNT: i64 = 99;

// ============================================================================
// Settings
// ============================================================================

/// Duration/cycle configuration of a session.
///
/// Serialized with the camelCase field names of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Work duration, minutes component
    pub work_time: u32,
    /// Work duration, seconds component (0-59)
    pub work_seconds: u32,
    /// Rest duration, minutes component
    pub rest_time: u32,
    /// Rest duration, seconds component (0-59)
    pub rest_seconds: u32,
    /// Work intervals before a long break (>= 1)
    pub work_cycles: u32,
    /// Long break duration, minutes component
    pub long_break_time: u32,
    /// Long break duration, seconds component (0-59)
    pub long_break_seconds: u32,
    /// Sets in a full session (>= 1)
    pub total_sets: u32,
    /// Cue volume (0-100, 0 mutes)
    pub volume: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_time: 45,
            work_seconds: 0,
            rest_time: 5,
            rest_seconds: 0,
            work_cycles: 4,
            long_break_time: 30,
            long_break_seconds: 0,
            total_sets: 2,
            volume: 75,
        }
    }
}

impl Settings {
    /// Work phase length in seconds.
    pub fn work_duration(&self) -> u32 {
        combine(self.work_time, self.work_seconds)
    }

    /// Rest phase length in seconds.
    pub fn rest_duration(&self) -> u32 {
        combine(self.rest_time, self.rest_seconds)
    }

    /// Long break length in seconds.
    pub fn long_break_duration(&self) -> u32 {
        combine(self.long_break_time, self.long_break_seconds)
    }

    /// Returns true when cues are silenced.
    pub fn is_muted(&self) -> bool {
        self.volume == 0
    }

    /// Returns the current value of a setting.
    pub fn get(&self, key: SettingKey) -> u32 {
        match key {
            SettingKey::WorkTime => self.work_time,
            SettingKey::WorkSeconds => self.work_seconds,
            SettingKey::RestTime => self.rest_time,
            SettingKey::RestSeconds => self.rest_seconds,
            SettingKey::WorkCycles => self.work_cycles,
            SettingKey::LongBreakTime => self.long_break_time,
            SettingKey::LongBreakSeconds => self.long_break_seconds,
            SettingKey::TotalSets => self.total_sets,
            SettingKey::Volume => u32::from(self.volume),
        }
    }

    /// Parses and validates `raw`, then stores it under `key`.
    ///
    /// On error the settings are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotANumber` if `raw` is not an integer and `OutOfRange`
    /// if it lies outside [`SettingKey::range`].
    pub fn update(&mut self, key: SettingKey, raw: &str) -> Result<(), SettingsError> {
        let value: i64 = raw.trim().parse().map_err(|_| SettingsError::NotANumber {
            key,
            value: raw.to_string(),
        })?;
        let value = key.check(value)?;

        match key {
            SettingKey::WorkTime => self.work_time = value,
            SettingKey::WorkSeconds => self.work_seconds = value,
            SettingKey::RestTime => self.rest_time = value,
            SettingKey::RestSeconds => self.rest_seconds = value,
            SettingKey::WorkCycles => self.work_cycles = value,
            SettingKey::LongBreakTime => self.long_break_time = value,
            SettingKey::LongBreakSeconds => self.long_break_seconds = value,
            SettingKey::TotalSets => self.total_sets = value,
            // check() bounds volume to 0..=100
            SettingKey::Volume => self.volume = u8::try_from(value).unwrap_or(u8::MAX),
        }
        Ok(())
    }

    /// Validates every field.
    ///
    /// # Errors
    ///
    /// Returns the first `OutOfRange` violation found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for key in SettingKey::ALL {
            key.check(i64::from(self.get(key)))?;
        }
        Ok(())
    }
}

fn combine(minutes: u32, seconds: u32) -> u32 {
    minutes.saturating_mul(60).saturating_add(seconds)
}

// ============================================================================
// SettingKey
// ============================================================================

/// Names of the individually updatable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    WorkTime,
    WorkSeconds,
    RestTime,
    RestSeconds,
    WorkCycles,
    LongBreakTime,
    LongBreakSeconds,
    TotalSets,
    Volume,
}

impl SettingKey {
    /// Every key, in display order.
    pub const ALL: [SettingKey; 9] = [
        SettingKey::WorkTime,
        SettingKey::WorkSeconds,
        SettingKey::RestTime,
        SettingKey::RestSeconds,
        SettingKey::WorkCycles,
        SettingKey::LongBreakTime,
        SettingKey::LongBreakSeconds,
        SettingKey::TotalSets,
        SettingKey::Volume,
    ];

    /// Returns the camelCase name used in the settings file.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::WorkTime => "workTime",
            SettingKey::WorkSeconds => "workSeconds",
            SettingKey::RestTime => "restTime",
            SettingKey::RestSeconds => "restSeconds",
            SettingKey::WorkCycles => "workCycles",
            SettingKey::LongBreakTime => "longBreakTime",
            SettingKey::LongBreakSeconds => "longBreakSeconds",
            SettingKey::TotalSets => "totalSets",
            SettingKey::Volume => "volume",
        }
    }

    /// Returns the inclusive range of accepted values.
    pub fn range(&self) -> (i64, i64) {
        match self {
            SettingKey::WorkTime | SettingKey::RestTime | SettingKey::LongBreakTime => {
                (0, MAX_MINUTES)
            }
            SettingKey::WorkSeconds | SettingKey::RestSeconds | SettingKey::LongBreakSeconds => {
                (0, 59)
            }
            SettingKey::WorkCycles | SettingKey::TotalSets => (1, MAX_COUNT),
            SettingKey::Volume => (0, 100),
        }
    }

    fn check(self, value: i64) -> Result<u32, SettingsError> {
        let (min, max) = self.range();
        if value < min || value > max {
            return Err(SettingsError::OutOfRange {
                key: self,
                value,
                min,
                max,
            });
        }
        u32::try_from(value).map_err(|_| SettingsError::OutOfRange {
            key: self,
            value,
            min,
            max,
        })
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    /// Accepts the camelCase file names as well as snake_case and kebab-case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod settings_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let settings = Settings::default();
            assert_eq!(settings.work_duration(), 2700);
            assert_eq!(settings.rest_duration(), 300);
            assert_eq!(settings.long_break_duration(), 1800);
            assert_eq!(settings.work_cycles, 4);
            assert_eq!(settings.total_sets, 2);
            assert_eq!(settings.volume, 75);
            assert!(settings.validate().is_ok());
        }

        #[test]
        fn test_durations_combine_minutes_and_seconds() {
            let settings = Settings {
                work_time: 1,
                work_seconds: 30,
                rest_time: 0,
                rest_seconds: 45,
                long_break_time: 2,
                long_break_seconds: 5,
                ..Settings::default()
            };
            assert_eq!(settings.work_duration(), 90);
            assert_eq!(settings.rest_duration(), 45);
            assert_eq!(settings.long_break_duration(), 125);
        }

        #[test]
        fn test_update_accepts_valid_value() {
            let mut settings = Settings::default();
            settings.update(SettingKey::WorkSeconds, "30").unwrap();
            assert_eq!(settings.work_seconds, 30);

            settings.update(SettingKey::Volume, " 0 ").unwrap();
            assert_eq!(settings.volume, 0);
            assert!(settings.is_muted());
        }

        #[test]
        fn test_update_rejects_non_numeric_and_keeps_value() {
            let mut settings = Settings::default();
            let result = settings.update(SettingKey::WorkTime, "abc");

            assert!(matches!(result, Err(SettingsError::NotANumber { .. })));
            assert_eq!(settings, Settings::default());
        }

        #[test]
        fn test_update_rejects_seconds_out_of_range() {
            let mut settings = Settings::default();

            assert!(settings.update(SettingKey::RestSeconds, "60").is_err());
            assert!(settings.update(SettingKey::RestSeconds, "-1").is_err());
            assert!(settings.update(SettingKey::RestSeconds, "59").is_ok());
            assert_eq!(settings.rest_seconds, 59);
        }

        #[test]
        fn test_update_rejects_volume_out_of_range() {
            let mut settings = Settings::default();
            let result = settings.update(SettingKey::Volume, "101");

            match result {
                Err(SettingsError::OutOfRange { min, max, value, .. }) => {
                    assert_eq!((min, max, value), (0, 100, 101));
                }
                other => panic!("Expected OutOfRange, got {:?}", other),
            }
            assert_eq!(settings.volume, 75);
        }

        #[test]
        fn test_update_rejects_zero_cycles_and_sets() {
            let mut settings = Settings::default();
            assert!(settings.update(SettingKey::WorkCycles, "0").is_err());
            assert!(settings.update(SettingKey::TotalSets, "0").is_err());
            assert_eq!(settings.work_cycles, 4);
            assert_eq!(settings.total_sets, 2);
        }

        #[test]
        fn test_validate_detects_bad_field() {
            let settings = Settings {
                long_break_seconds: 75,
                ..Settings::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(SettingsError::OutOfRange {
                    key: SettingKey::LongBreakSeconds,
                    ..
                })
            ));
        }

        #[test]
        fn test_deserialize_fills_missing_fields_with_defaults() {
            let settings: Settings = serde_json::from_str(r#"{"workTime": 25}"#).unwrap();
            assert_eq!(settings.work_time, 25);
            assert_eq!(settings.rest_time, 5);
            assert_eq!(settings.volume, 75);
        }

        #[test]
        fn test_serialize_uses_file_names() {
            let json = serde_json::to_string(&Settings::default()).unwrap();
            for key in SettingKey::ALL {
                assert!(json.contains(&format!("\"{}\"", key.as_str())), "{}", key);
            }
        }
    }

    mod setting_key_tests {
        use super::*;

        #[test]
        fn test_from_str_accepts_variants() {
            assert_eq!(
                "workSeconds".parse::<SettingKey>().unwrap(),
                SettingKey::WorkSeconds
            );
            assert_eq!(
                "long_break_time".parse::<SettingKey>().unwrap(),
                SettingKey::LongBreakTime
            );
            assert_eq!(
                "total-sets".parse::<SettingKey>().unwrap(),
                SettingKey::TotalSets
            );
        }

        #[test]
        fn test_from_str_rejects_unknown() {
            let result = "soundEnabled".parse::<SettingKey>();
            assert!(matches!(result, Err(SettingsError::UnknownKey(ref k)) if k == "soundEnabled"));
        }

        #[test]
        fn test_get_reads_every_key() {
            let settings = Settings::default();
            assert_eq!(settings.get(SettingKey::WorkTime), 45);
            assert_eq!(settings.get(SettingKey::LongBreakTime), 30);
            assert_eq!(settings.get(SettingKey::Volume), 75);
        }
    }
}
