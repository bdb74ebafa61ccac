//! Configuration management for micscope.
//!
//! Configuration lives in an optional TOML file in the user's config directory.

pub mod file;

pub use file::{get_config_path, AudioConfig, DisplayConfig, ScopeConfig, SmoothingMode, WaveformBounds};
