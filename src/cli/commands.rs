//! Command definitions for the zen-pomodoro CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::SettingKey;

// ============================================================================
// CLI Structure
// ============================================================================

/// zen-pomodoro - a work/rest/long-break interval timer
#[derive(Parser, Debug)]
#[command(
    name = "zen-pomodoro",
    version,
    about = "A work/rest/long-break interval timer for the terminal",
    long_about = "A Pomodoro timer that cycles through work intervals, short rests and \n\
                  long breaks across several sets, with sound cues and desktop notifications.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of ~/.zen-pomodoro/settings.json
    #[arg(long, global = true, value_name = "PATH")]
    pub settings_file: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Show or change the timer settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Print the length of a whole session with the current settings
    Total,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    /// Show the current settings
    Show,

    /// Change one setting, e.g. `settings set workSeconds 30`
    Set {
        /// Setting name (camelCase or snake_case)
        #[arg(value_parser = parse_setting_key)]
        key: SettingKey,

        /// New value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Toggle between muted and the last volume
    Mute,

    /// Restore the default settings
    Reset,
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    /// Start in the fullscreen view
    #[arg(short, long)]
    pub fullscreen: bool,

    /// Directory with the cue sound files (default ~/.zen-pomodoro/sounds)
    #[arg(short, long, value_name = "DIR")]
    pub sounds: Option<PathBuf>,

    /// Disable sound cues
    #[arg(long)]
    pub no_sound: bool,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notifications: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a setting name.
fn parse_setting_key(s: &str) -> Result<SettingKey, String> {
    s.parse::<SettingKey>().map_err(|e| {
        let names: Vec<&str> = SettingKey::ALL.iter().map(SettingKey::as_str).collect();
        format!("{} (expected one of: {})", e, names.join(", "))
    })
}

// ============================================================================
// Tests
// ============================================================================
