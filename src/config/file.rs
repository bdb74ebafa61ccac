//! Configuration file management for micscope.
//!
//! The configuration file is optional. When it is missing every value falls back
//! to its default; when it is present, sections and keys may be omitted.

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How per-frame maxima are folded into the history strip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingMode {
    /// Average non-overlapping blocks of `trailing_window` frames, one history entry per block
    #[default]
    Block,
    /// Trailing average over the last `trailing_window` frames, one history entry per frame
    Sliding,
}

impl std::fmt::Display for SmoothingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Block => write!(f, "block"),
            Self::Sliding => write!(f, "sliding"),
        }
    }
}

/// Horizontal extent of the waveform polyline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaveformBounds {
    /// Plot every sample of the frame, even past the right edge of the surface
    #[default]
    Unbounded,
    /// Stop at the last sample that fits inside the surface width
    Clamped,
}

impl std::fmt::Display for WaveformBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Clamped => write!(f, "clamped"),
        }
    }
}

/// Audio input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `micscope list-devices`
    /// - device name from `micscope list-devices`
    #[serde(default = "default_device")]
    pub device: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
        }
    }
}

/// Chart layout and smoothing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Horizontal plotting positions across each chart; also the history length
    #[serde(default = "default_slice_count")]
    pub slice_count: usize,
    /// Frames averaged together per history entry
    #[serde(default = "default_trailing_window")]
    pub trailing_window: usize,
    #[serde(default)]
    pub smoothing: SmoothingMode,
    #[serde(default)]
    pub waveform_bounds: WaveformBounds,
    /// Delay between frame ticks in milliseconds
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            slice_count: default_slice_count(),
            trailing_window: default_trailing_window(),
            smoothing: SmoothingMode::default(),
            waveform_bounds: WaveformBounds::default(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

fn default_device() -> String {
    "default".to_string()
}

fn default_slice_count() -> usize {
    100
}

fn default_trailing_window() -> usize {
    3
}

fn default_frame_interval_ms() -> u64 {
    16
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScopeConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl ScopeConfig {
    /// Loads configuration from the user's config directory, or defaults if there is none.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file exists but cannot be read or parsed
    /// - If a value is out of range
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Loads configuration from `path`, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: ScopeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.display.slice_count == 0 {
            bail!("display.slice_count must be at least 1");
        }
        if self.display.trailing_window == 0 {
            bail!("display.trailing_window must be at least 1");
        }
        if self.display.frame_interval_ms == 0 {
            bail!("display.frame_interval_ms must be at least 1");
        }
        Ok(())
    }
}

/// Retrieves the path to the config file. The file itself may not exist.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("micscope").join("micscope.toml"))
}
