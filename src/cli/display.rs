//! Display utilities for the zen-pomodoro CLI.
//!
//! This module provides formatted output for:
//! - The normal and fullscreen timer views
//! - Settings and session length
//! - Error messages

use crate::settings::{SettingKey, Settings};
use crate::types::TimerState;

/// ANSI sequence clearing the terminal and homing the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Width of the progress bar in characters.
const PROGRESS_WIDTH: usize = 30;

/// Text shown in place of the clock once the session is over.
pub const FINISHED_TEXT: &str = "Finish!";

// ============================================================================
// View
// ============================================================================

/// The two timer presentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Normal,
    Fullscreen,
}

impl View {
    /// Returns the other view.
    pub fn toggled(self) -> Self {
        match self {
            View::Normal => View::Fullscreen,
            View::Fullscreen => View::Normal,
        }
    }
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders a timer frame, including the clear-screen prefix.
    pub fn render(state: &TimerState, settings: &Settings, progress: f64, view: View) -> String {
        let clock = if state.is_finished {
            FINISHED_TEXT.to_string()
        } else {
            Self::format_time(state.remaining_seconds)
        };
        let status = if state.is_finished {
            "finished"
        } else if state.is_running {
            "running"
        } else {
            "paused"
        };
        let position = format!(
            "cycle {}/{}  set {}/{}",
            state.cycle, settings.work_cycles, state.set, settings.total_sets
        );

        let mut frame = String::from(CLEAR_SCREEN);
        match view {
            View::Normal => {
                frame.push_str(&format!("{}  {}\n", state.phase.label(), position));
                frame.push_str(&format!("{}  ({})\n", clock, status));
                frame.push_str(&format!("{}\n", Self::progress_bar(progress)));
                if settings.is_muted() {
                    frame.push_str("muted\n");
                }
                frame.push_str("\nt toggle  r reset  f fullscreen  m mute  s <key> <value>  q quit\n");
            }
            View::Fullscreen => {
                frame.push_str("\n\n\n");
                frame.push_str(&format!("        {}\n\n", state.phase.label().to_uppercase()));
                frame.push_str(&format!("        {}\n\n", Self::spaced(&clock)));
                frame.push_str(&format!("        {}\n", position));
                frame.push_str(&format!("        {}\n", Self::progress_bar(progress)));
                frame.push_str("\n\n        t toggle  r reset  f exit fullscreen  q quit\n");
            }
        }
        frame
    }

    /// Formats seconds as `MM:SS`.
    pub fn format_time(total_seconds: u32) -> String {
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Formats a session length as `Hh MMm SSs`.
    pub fn format_duration(total_seconds: u64) -> String {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    }

    /// Renders `percent` as a bar followed by the rounded percentage.
    pub fn progress_bar(percent: f64) -> String {
        let percent = percent.clamp(0.0, 100.0);
        let filled = ((percent / 100.0) * PROGRESS_WIDTH as f64).round() as usize;
        format!(
            "[{}{}] {:>3.0}%",
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH - filled),
            percent
        )
    }

    /// Renders the settings as `name = value` lines.
    pub fn settings_table(settings: &Settings) -> String {
        SettingKey::ALL
            .iter()
            .map(|key| format!("{:<18} = {}\n", key.as_str(), settings.get(*key)))
            .collect()
    }

    /// Shows the current settings.
    pub fn show_settings(settings: &Settings) {
        print!("{}", Self::settings_table(settings));
    }

    /// Shows the length of a whole session.
    pub fn show_total(total_seconds: u64) {
        println!("{}", total_seconds);
        println!("({})", Self::format_duration(total_seconds));
    }

    /// Shows a confirmation message.
    pub fn show_success(message: &str) {
        println!("* {}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    fn spaced(text: &str) -> String {
        text.chars()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// Tests
// ============================================================================
