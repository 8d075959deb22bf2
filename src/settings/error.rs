//! Settings error types.
//!
//! Validation errors are recoverable: the offending update is discarded
//! and the previous value is kept.

use thiserror::Error;

use super::SettingKey;

/// Errors that can occur while updating, loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The key does not name a setting.
    #[error("unknown setting '{0}'")]
    UnknownKey(String),

    /// The value could not be parsed as an integer.
    #[error("invalid value for {key}: '{value}' is not a number")]
    NotANumber {
        /// Setting being updated
        key: SettingKey,
        /// Raw input
        value: String,
    },

    /// The value is outside the allowed range.
    #[error("invalid value for {key}: {value} (must be between {min} and {max})")]
    OutOfRange {
        /// Setting being updated
        key: SettingKey,
        /// Parsed input
        value: i64,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },

    /// The home directory could not be determined.
    #[error("home directory could not be determined")]
    HomeNotFound,

    /// The settings file could not be read.
    #[error("failed to read settings file: {0}")]
    ReadFailed(String),

    /// The settings file could not be written.
    #[error("failed to write settings file: {0}")]
    WriteFailed(String),

    /// The settings file does not contain a valid settings document.
    #[error("settings file is malformed: {0}")]
    Malformed(String),
}

impl SettingsError {
    /// Returns true if this error rejects a single value.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownKey(_) | Self::NotANumber { .. } | Self::OutOfRange { .. }
        )
    }

    /// Returns true if this error comes from the settings file.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::HomeNotFound | Self::ReadFailed(_) | Self::WriteFailed(_) | Self::Malformed(_)
        )
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::UnknownKey(_) => "run `zen-pomodoro settings show` to list setting names",
            Self::NotANumber { .. } => "enter a whole number",
            Self::OutOfRange { .. } => "enter a value inside the allowed range",
            Self::HomeNotFound => "pass --settings-file to choose a location",
            Self::ReadFailed(_) | Self::WriteFailed(_) => "check the file permissions",
            Self::Malformed(_) => "fix or delete the settings file to restore defaults",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SettingsError::NotANumber {
            key: SettingKey::WorkSeconds,
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for workSeconds: 'abc' is not a number"
        );

        let err = SettingsError::OutOfRange {
            key: SettingKey::Volume,
            value: 101,
            min: 0,
            max: 100,
        };
        assert!(err.to_string().contains("between 0 and 100"));
    }

    #[test]
    fn test_is_validation_error() {
        assert!(SettingsError::UnknownKey("x".into()).is_validation_error());
        assert!(SettingsError::NotANumber {
            key: SettingKey::Volume,
            value: "x".into()
        }
        .is_validation_error());
        assert!(!SettingsError::HomeNotFound.is_validation_error());
        assert!(!SettingsError::ReadFailed("x".into()).is_validation_error());
    }

    #[test]
    fn test_is_storage_error() {
        assert!(SettingsError::Malformed("x".into()).is_storage_error());
        assert!(SettingsError::WriteFailed("x".into()).is_storage_error());
        assert!(!SettingsError::UnknownKey("x".into()).is_storage_error());
    }

    #[test]
    fn test_suggestion() {
        assert!(SettingsError::UnknownKey("x".into())
            .suggestion()
            .contains("settings show"));
        assert!(SettingsError::HomeNotFound
            .suggestion()
            .contains("--settings-file"));
    }
}
