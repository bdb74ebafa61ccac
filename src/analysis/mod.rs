//! Amplitude analysis for the scope.
//!
//! Turns captured PCM into fixed-size byte frames and derives per-frame statistics
//! from them. Nothing in here touches the terminal or the audio device.

pub mod analyser;
pub mod frame;
pub mod stats;

pub use analyser::AnalyserTap;
pub use frame::{SampleFrame, SILENCE, WINDOW_SIZE};
pub use stats::{FrameStats, FrameSummary, StatsError};
