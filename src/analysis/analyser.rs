//! Analysis node sitting between the audio callback and the render loop.
//!
//! The audio thread pushes interleaved float samples in; the render loop reads the
//! most recent window back out as unsigned bytes centred on [`SILENCE`].

use std::collections::VecDeque;

use super::frame::SILENCE;

/// Rolling window of the latest mono samples.
#[derive(Debug)]
pub struct AnalyserTap {
    window: usize,
    samples: VecDeque<f32>,
}

impl AnalyserTap {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            samples: VecDeque::with_capacity(window),
        }
    }

    /// Number of samples currently held (never more than the window).
    pub fn buffered(&self) -> usize {
        self.samples.len()
    }

    /// Appends interleaved samples, downmixing to mono by averaging channels.
    pub fn push_interleaved(&mut self, data: &[f32], channels: usize) {
        match channels {
            0 | 1 => {
                for &sample in data {
                    self.push(sample);
                }
            }
            _ => {
                for chunk in data.chunks_exact(channels) {
                    let sum: f32 = chunk.iter().sum();
                    self.push(sum / channels as f32);
                }
            }
        }
    }

    fn push(&mut self, sample: f32) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Copies the latest samples into `out` as bytes.
    ///
    /// The newest sample lands in the last slot. When fewer samples than `out.len()`
    /// have arrived, the leading slots read as silence.
    pub fn read_time_domain(&self, out: &mut [u8]) {
        let available = self.samples.len().min(out.len());
        let pad = out.len() - available;
        out[..pad].fill(SILENCE);

        let skip = self.samples.len() - available;
        for (slot, &sample) in out[pad..].iter_mut().zip(self.samples.iter().skip(skip)) {
            *slot = to_byte(sample);
        }
    }
}

/// Maps a float sample in -1.0..=1.0 to 0..=255 with 0.0 at [`SILENCE`].
pub fn to_byte(sample: f32) -> u8 {
    (128.0 * (1.0 + sample)).floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_samples_map_around_the_midpoint() {
        assert_eq!(to_byte(0.0), 128);
        assert_eq!(to_byte(-1.0), 0);
        assert_eq!(to_byte(1.0), 255);
        assert_eq!(to_byte(0.5), 192);
        assert_eq!(to_byte(-3.0), 0);
        assert_eq!(to_byte(f32::NAN), 0);
    }

    #[test]
    fn short_history_is_padded_with_silence() {
        let mut tap = AnalyserTap::new(8);
        tap.push_interleaved(&[0.5, -0.5], 1);

        let mut out = [0u8; 8];
        tap.read_time_domain(&mut out);
        assert_eq!(out, [128, 128, 128, 128, 128, 128, 192, 64]);
    }

    #[test]
    fn only_the_latest_window_is_kept() {
        let mut tap = AnalyserTap::new(4);
        let data: Vec<f32> = (0..10).map(|i| i as f32 / 10.0).collect();
        tap.push_interleaved(&data, 1);
        assert_eq!(tap.buffered(), 4);

        let mut out = [0u8; 4];
        tap.read_time_domain(&mut out);
        let expected: Vec<u8> = data[6..].iter().map(|&s| to_byte(s)).collect();
        assert_eq!(out.to_vec(), expected);
    }

    #[test]
    fn stereo_is_downmixed() {
        let mut tap = AnalyserTap::new(4);
        tap.push_interleaved(&[1.0, 0.0, -0.5, -0.5, 0.25], 2);
        assert_eq!(tap.buffered(), 2);

        let mut out = [0u8; 2];
        tap.read_time_domain(&mut out);
        assert_eq!(out, [to_byte(0.5), to_byte(-0.5)]);
    }
}
