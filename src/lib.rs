//! micscope: a terminal microphone scope.
//!
//! Captures the default (or a chosen) input device, samples a 256-sample window
//! every frame, and draws it as a live waveform above a smoothed history of
//! per-frame peaks.
//!
//! The statistics, smoothing and history logic in [`analysis`], [`render`] and
//! [`scope`] never touch a device or a terminal directly; [`capture`] and [`ui`]
//! provide the real implementations of their capability traits.

pub mod analysis;
pub mod app;
pub mod capture;
pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
pub mod scope;
pub mod ui;
