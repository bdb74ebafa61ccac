//! Live scope command.
//!
//! Shows the start screen, opens the microphone when the user presses Enter, and
//! draws the waveform and history charts until the user quits.

use anyhow::anyhow;

use crate::capture::CpalCapture;
use crate::config::ScopeConfig;
use crate::scope::{run_scope, ScopeController, ScopeOutcome, ScopeSettings};
use crate::ui::{ErrorScreen, ScopeTui, ScopeTuiOptions};

/// Runs the scope.
///
/// `device` overrides `audio.device` from the config file; `now` skips the start screen.
///
/// # Errors
/// - If the configuration is invalid
/// - If the terminal cannot be set up
///
/// A capture failure is not an error here: the scope has already shown it to the
/// user, so it comes back as [`ScopeOutcome::CaptureFailed`] for [`exit_code`].
pub async fn handle_scope(device: Option<String>, now: bool) -> anyhow::Result<ScopeOutcome> {
    tracing::info!("=== micscope started ===");

    let config_data = match ScopeConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err:#}");
            let error_message = format!(
                "Configuration Error:\n\n{err:#}\n\nPlease check your ~/.config/micscope/micscope.toml file and try again."
            );
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(&error_message)?;
            error_screen.cleanup()?;
            return Err(anyhow!("Configuration error: {err}"));
        }
    };

    let device = device.unwrap_or_else(|| config_data.audio.device.clone());
    let display = &config_data.display;
    tracing::info!(
        "Configuration loaded: device={}, slices={}, trailing_window={}, smoothing={}, waveform_bounds={}",
        device,
        config_data.display.slice_count,
        config_data.display.trailing_window,
        config_data.display.smoothing,
        config_data.display.waveform_bounds
    );

    let settings = ScopeSettings::from_config(display);
    let options = ScopeTuiOptions {
        device_label: device.clone(),
        smoothing: display.smoothing,
        frame_interval: std::time::Duration::from_millis(display.frame_interval_ms),
        auto_start: now,
    };

    // The frame loop blocks on terminal input, so it gets its own thread.
    let outcome = tokio::task::spawn_blocking(move || -> anyhow::Result<ScopeOutcome> {
        let controller = ScopeController::new(settings);
        let mut capture = CpalCapture::new(device);
        let mut tui = ScopeTui::new(options)?;

        let outcome = run_scope(&controller, &mut capture, &mut tui);
        tui.cleanup()?;
        outcome
    })
    .await
    .map_err(|e| anyhow!("Scope task failed: {e}"))??;

    match outcome {
        ScopeOutcome::Dismissed => {
            tracing::info!("=== micscope exited without capturing ===");
        }
        ScopeOutcome::CaptureFailed => {
            tracing::info!("=== micscope exited without an input stream ===");
        }
        ScopeOutcome::Stopped { ticks } => {
            tracing::info!("=== micscope exited after {} frames ===", ticks);
        }
    }

    Ok(outcome)
}

/// Process exit status for a finished scope run, if it should not exit cleanly.
pub fn exit_code(outcome: ScopeOutcome) -> Option<i32> {
    match outcome {
        ScopeOutcome::CaptureFailed => Some(1),
        ScopeOutcome::Dismissed | ScopeOutcome::Stopped { .. } => None,
    }
}
