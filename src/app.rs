//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process;

/// A terminal microphone scope with a live waveform and a smoothed level history
#[derive(Parser)]
#[command(name = "micscope")]
#[command(version)]
#[command(about = "Terminal microphone scope with a live waveform and a smoothed level history")]
#[command(long_about = "Terminal microphone scope with a live waveform and a smoothed level history.\n\nThe top chart shows the latest 256-sample window from the microphone. The bottom\nchart shows per-frame peaks, averaged over a few frames and wrapped around a\nfixed-width history.\n\nDEFAULT COMMAND:\n    If no command is specified, 'scope' is used by default.\n\nEXAMPLES:\n    # Start the scope and press Enter to begin capture\n    $ micscope\n\n    # Capture immediately from input device #2\n    $ micscope --now --device 2\n\n    # See which input devices exist\n    $ micscope list-devices")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/micscope/micscope.toml\n    Logs:               ~/.local/state/micscope/micscope.log.*"
)]
struct Cli {
    /// Input device name or ID from `list-devices` (scope default command)
    #[arg(short, long, value_name = "DEVICE", global = true)]
    device: Option<String>,

    /// Start capturing without waiting for Enter (scope default command)
    #[arg(short, long, global = true)]
    now: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the live waveform and history (default)
    ///
    /// Press Enter on the start screen to open the microphone. While running,
    /// Space pauses/resumes and Escape/q quits.
    #[command(visible_alias = "s")]
    Scope,

    /// List available audio input devices
    ///
    /// Shows device IDs, names, and configurations to help pick the
    /// input device for --device or micscope.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show the config file path and the settings in effect
    ///
    /// Prints the values micscope would run with, falling back to defaults
    /// where the file is missing. Use --init to write a default file.
    #[command(visible_alias = "c")]
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file when used with --init
        #[arg(long, requires = "init")]
        force: bool,
    },

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that don't need logging
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "micscope", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            if let Err(e) = commands::handle_list_devices() {
                eprintln!("Error: {e}");
                process::exit(1);
            }
            return Ok(());
        }
        Some(Commands::Logs) => {
            if let Err(e) = commands::handle_logs() {
                eprintln!("Error: {e}");
                process::exit(1);
            }
            return Ok(());
        }
        _ => {}
    }

    logging::init_logging()?;

    match cli.command {
        None | Some(Commands::Scope) => {
            let outcome = commands::handle_scope(cli.device, cli.now).await?;
            // Already on screen and in the log; only the status is left to report.
            if let Some(code) = commands::scope::exit_code(outcome) {
                process::exit(code);
            }
        }
        Some(Commands::Config { init, force }) => {
            commands::handle_config(init, force)?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
