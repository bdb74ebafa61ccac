//! cpal-backed audio capture.
//!
//! Opens the configured input device at its native configuration, downmixes
//! whatever arrives to mono and feeds it into an [`AnalyserTap`]. No processing
//! (echo cancellation, gain control) is requested from the host.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::{Arc, Mutex, PoisonError};

use super::{CaptureApi, CaptureError, SampleSource};
use crate::analysis::{AnalyserTap, SampleFrame};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Capture API over the default cpal host.
#[derive(Debug, Clone)]
pub struct CpalCapture {
    /// Device name, numeric index or "default"
    device: String,
}

impl CpalCapture {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

impl CaptureApi for CpalCapture {
    type Source = CpalStream;

    fn request_audio(&mut self, window: usize) -> Result<CpalStream, CaptureError> {
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();
            if self.device == "default" {
                host.default_input_device()
                    .ok_or(CaptureError::NoDefaultDevice)
            } else {
                find_device(&host, &self.device)
            }
        })?;

        let name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Capture device: {}", name);

        let supported = device.default_input_config()?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.config();

        tracing::debug!(
            "Device configuration: {}Hz, {} channels, {:?}",
            config.sample_rate.0,
            config.channels,
            sample_format
        );

        let tap = Arc::new(Mutex::new(AnalyserTap::new(window)));

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&tap)),
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&tap)),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&tap)),
            cpal::SampleFormat::I32 => build_stream::<i32>(&device, &config, Arc::clone(&tap)),
            other => Err(CaptureError::UnsupportedFormat(other)),
        }?;

        stream.play()?;
        tracing::debug!("Audio stream started");

        Ok(CpalStream {
            _stream: stream,
            tap,
            name,
        })
    }
}

/// A running cpal input stream and its analysis node.
///
/// Dropping this stops capture.
pub struct CpalStream {
    _stream: cpal::Stream,
    tap: Arc<Mutex<AnalyserTap>>,
    name: String,
}

impl SampleSource for CpalStream {
    fn read_time_domain(&mut self, frame: &mut SampleFrame) {
        let tap = self.tap.lock().unwrap_or_else(PoisonError::into_inner);
        tap.read_time_domain(frame.as_mut_slice());
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    tap: Arc<Mutex<AnalyserTap>>,
) -> Result<cpal::Stream, CaptureError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;
    let mut scratch: Vec<f32> = Vec::new();

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            scratch.clear();
            scratch.extend(data.iter().map(|&s| f32::from_sample(s)));
            feed_tap(&tap, &scratch, channels);
        },
        |err| {
            tracing::error!("Audio stream error: {}", err);
        },
        None,
    )?;

    Ok(stream)
}

/// Pushes one callback's worth of samples into the shared tap.
///
/// A poisoned lock is recovered the same way the reader recovers it, so capture
/// keeps flowing after a panic on the other side.
fn feed_tap(tap: &Mutex<AnalyserTap>, data: &[f32], channels: usize) {
    tap.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push_interleaved(data, channels);
}

/// Finds an audio input device by name or numeric index.
///
/// # Errors
/// - If the devices cannot be enumerated
/// - If no device with the specified name/index is found
pub fn find_device(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device, CaptureError> {
    if let Ok(index) = device_spec.parse::<usize>() {
        let devices: Vec<_> = host.input_devices()?.collect();
        let max = devices.len().saturating_sub(1);
        return devices
            .into_iter()
            .nth(index)
            .ok_or(CaptureError::DeviceIndexOutOfRange { index, max });
    }

    host.input_devices()?
        .find(|device| device.name().is_ok_and(|name| name == device_spec))
        .ok_or_else(|| CaptureError::DeviceNotFound(device_spec.to_string()))
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
#[cfg(target_os = "linux")]
pub fn suppress_alsa_warnings<F, T, E>(f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<std::io::Error>,
{
    let dev_null = OpenOptions::new().write(true).open("/dev/null")?;
    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(std::io::Error::last_os_error().into());
    }

    if unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) } == -1 {
        let err = std::io::Error::last_os_error();
        unsafe { libc::close(old_stderr) };
        return Err(err.into());
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// ALSA only exists on Linux; elsewhere this just runs `f`.
#[cfg(not(target_os = "linux"))]
pub fn suppress_alsa_warnings<F, T, E>(f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<std::io::Error>,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poisoned_tap_still_receives_samples() {
        let tap = Arc::new(Mutex::new(AnalyserTap::new(4)));
        let poisoner = Arc::clone(&tap);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("audio thread died holding the tap");
        })
        .join();
        assert!(tap.is_poisoned());

        feed_tap(&tap, &[0.5, -0.5, 0.5, -0.5], 2);

        let tap = tap.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(tap.buffered(), 2);
    }

    #[test]
    fn numeric_device_spec_out_of_range_is_reported() {
        let err = CaptureError::DeviceIndexOutOfRange { index: 9, max: 2 };
        assert_eq!(err.to_string(), "Device index 9 is out of range (0-2)");
    }
}
