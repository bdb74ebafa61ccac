//! Configuration command.
//!
//! Prints where micscope looks for its config file and the settings it would run
//! with, or writes a default file with `--init`.

use std::path::Path;

use crate::config::{get_config_path, ScopeConfig};

/// Shows the effective configuration, or writes the default file when `init` is set.
///
/// An existing file is only replaced by `init` together with `force`.
///
/// # Errors
/// - If the config path cannot be determined
/// - If the existing file is invalid
/// - If the default file cannot be written
pub fn handle_config(init: bool, force: bool) -> anyhow::Result<()> {
    let config_path = get_config_path()?;

    if init {
        if init_config(&config_path, force)? {
            println!("Wrote default configuration to {}", config_path.display());
        } else {
            println!(
                "{} already exists; pass --force to overwrite it",
                config_path.display()
            );
        }
        return Ok(());
    }

    let source = if config_path.exists() {
        "file"
    } else {
        "defaults, no file"
    };
    let config = ScopeConfig::load_from(&config_path)?;
    tracing::debug!("Showing configuration from {}", config_path.display());

    println!("# {} ({source})", config_path.display());
    print!("{}", render_effective(&config)?);
    Ok(())
}

/// Writes the default configuration to `path`.
///
/// Returns `false` without touching the file if it exists and `force` is not set.
pub fn init_config(path: &Path, force: bool) -> anyhow::Result<bool> {
    if path.exists() && !force {
        tracing::info!("Config file {} kept", path.display());
        return Ok(false);
    }
    ScopeConfig::default().save_to(path)?;
    Ok(true)
}

/// TOML text for `config`, in the same layout the file uses.
pub fn render_effective(config: &ScopeConfig) -> anyhow::Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmoothingMode;
    use std::fs;

    #[test]
    fn init_creates_missing_directories_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("micscope.toml");

        assert!(init_config(&path, false).unwrap());
        assert_eq!(ScopeConfig::load_from(&path).unwrap(), ScopeConfig::default());
    }

    #[test]
    fn init_keeps_an_existing_file_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("micscope.toml");
        fs::write(&path, "[display]\nsmoothing = \"sliding\"\n").unwrap();

        assert!(!init_config(&path, false).unwrap());
        let kept = ScopeConfig::load_from(&path).unwrap();
        assert_eq!(kept.display.smoothing, SmoothingMode::Sliding);

        assert!(init_config(&path, true).unwrap());
        let replaced = ScopeConfig::load_from(&path).unwrap();
        assert_eq!(replaced.display.smoothing, SmoothingMode::Block);
    }

    #[test]
    fn effective_config_reads_back_unchanged() {
        let mut config = ScopeConfig::default();
        config.audio.device = "USB Mic".to_string();
        config.display.trailing_window = 5;

        let text = render_effective(&config).unwrap();
        assert!(text.contains("[audio]"));
        assert!(text.contains("[display]"));
        assert!(text.contains("trailing_window = 5"));
        assert_eq!(ScopeConfig::from_toml_str(&text).unwrap(), config);
    }
}
