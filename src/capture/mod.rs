//! Audio capture capability.
//!
//! The scope asks a [`CaptureApi`] for a stream once, then pulls one frame per tick
//! from the returned [`SampleSource`]. The cpal implementation lives in
//! [`device`]; tests substitute their own.

pub mod device;

use thiserror::Error;

use crate::analysis::SampleFrame;

pub use device::{CpalCapture, CpalStream};

/// Reasons an input stream could not be acquired.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoDefaultDevice,
    #[error(
        "Audio input device '{0}' not found. Use 'micscope list-devices' to see available devices."
    )]
    DeviceNotFound(String),
    #[error("Device index {index} is out of range (0-{max})")]
    DeviceIndexOutOfRange { index: usize, max: usize },
    #[error("Failed to enumerate devices: {0}")]
    Enumerate(#[from] cpal::DevicesError),
    #[error("Failed to read device configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("Unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),
    #[error("Failed to open input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("Failed to start input stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A live stream that can be sampled once per tick.
pub trait SampleSource {
    /// Overwrites `frame` with the most recent time-domain samples.
    fn read_time_domain(&mut self, frame: &mut SampleFrame);

    /// Human-readable name of whatever is being captured.
    fn name(&self) -> &str {
        "audio input"
    }
}

/// Platform entry point for plain audio input.
pub trait CaptureApi {
    type Source: SampleSource;

    /// Requests an input stream analysed over windows of `window` samples.
    fn request_audio(&mut self, window: usize) -> Result<Self::Source, CaptureError>;
}
