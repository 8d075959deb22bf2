//! CLI module for zen-pomodoro.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and the timer views
//! - `session`: The interactive timer session

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{Cli, Commands, RunArgs, SettingsAction};
pub use display::{Display, View};
pub use session::{run_session, SessionInput};
