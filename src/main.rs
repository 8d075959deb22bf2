//! zen-pomodoro - a work/rest/long-break interval timer
//!
//! The timer cycles through:
//! - work intervals (45 minutes by default)
//! - short rests between them (5 minutes)
//! - a long break between sets (30 minutes)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use zen_pomodoro::cli::{run_session, Cli, Commands, Display, SettingsAction};
use zen_pomodoro::{total_session_seconds, SettingsStore};

/// Main entry point
#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never mix with the timer view.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            let store = open_store(cli.settings_file)?;
            run_session(store, args).await?;
        }
        Some(Commands::Settings { action }) => {
            let mut store = open_store(cli.settings_file)?;
            match action {
                SettingsAction::Show => Display::show_settings(store.settings()),
                SettingsAction::Set { key, value } => {
                    store
                        .update(key.as_str(), &value)
                        .with_context(|| format!("Failed to update {}", key))?;
                    Display::show_success(&format!("{} = {}", key, store.settings().get(key)));
                }
                SettingsAction::Mute => {
                    let volume = store.toggle_mute().context("Failed to save settings")?;
                    if volume == 0 {
                        Display::show_success("Sound muted");
                    } else {
                        Display::show_success(&format!("Sound unmuted (volume {})", volume));
                    }
                }
                SettingsAction::Reset => {
                    store
                        .reset_to_defaults()
                        .context("Failed to save settings")?;
                    Display::show_success("Settings restored to defaults");
                }
            }
        }
        Some(Commands::Total) => {
            let store = open_store(cli.settings_file)?;
            Display::show_total(total_session_seconds(store.settings()));
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Opens the settings store at `path`, or at the default location.
fn open_store(path: Option<PathBuf>) -> Result<SettingsStore> {
    let path = match path {
        Some(path) => path,
        None => SettingsStore::default_path().context("Failed to locate the settings file")?,
    };
    SettingsStore::open(&path)
        .with_context(|| format!("Failed to open settings at {}", path.display()))
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
