//! Per-frame amplitude statistics.

use std::cell::OnceCell;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("cannot compute statistics over an empty frame")]
    EmptyFrame,
}

/// Max, min and mean of one frame, copied out of [`FrameStats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    pub max: u8,
    pub min: u8,
    pub avg: f64,
}

/// Lazily computed statistics over one frame.
///
/// The scan runs on the first call to any accessor and is cached for the
/// lifetime of the value.
#[derive(Debug)]
pub struct FrameStats<'a> {
    samples: &'a [u8],
    summary: OnceCell<FrameSummary>,
}

impl<'a> FrameStats<'a> {
    /// Wraps a frame for analysis.
    ///
    /// # Errors
    /// - If `samples` is empty
    pub fn new(samples: &'a [u8]) -> Result<Self, StatsError> {
        if samples.is_empty() {
            return Err(StatsError::EmptyFrame);
        }
        Ok(Self {
            samples,
            summary: OnceCell::new(),
        })
    }

    pub fn max(&self) -> u8 {
        self.summary().max
    }

    pub fn min(&self) -> u8 {
        self.summary().min
    }

    pub fn avg(&self) -> f64 {
        self.summary().avg
    }

    /// Returns all three statistics, scanning the frame if not done yet.
    pub fn summary(&self) -> FrameSummary {
        *self.summary.get_or_init(|| scan(self.samples))
    }

    /// Whether the frame has been scanned yet.
    pub fn is_computed(&self) -> bool {
        self.summary.get().is_some()
    }
}

fn scan(samples: &[u8]) -> FrameSummary {
    let mut max = u8::MIN;
    let mut min = u8::MAX;
    let mut sum = 0u64;

    for &sample in samples {
        if sample > max {
            max = sample;
        }
        if sample < min {
            min = sample;
        }
        sum += u64::from(sample);
    }

    FrameSummary {
        max,
        min,
        avg: sum as f64 / samples.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_is_rejected() {
        assert_eq!(FrameStats::new(&[]).unwrap_err(), StatsError::EmptyFrame);
    }

    #[test]
    fn extrema_and_mean_are_exact() {
        let samples = [128u8, 0, 255, 64, 200, 12];
        let stats = FrameStats::new(&samples).unwrap();
        assert_eq!(stats.max(), 255);
        assert_eq!(stats.min(), 0);
        let expected = samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64;
        assert!((stats.avg() - expected).abs() < 1e-9);
    }

    #[test]
    fn constant_frame_collapses_to_one_value() {
        let samples = [77u8; 256];
        let stats = FrameStats::new(&samples).unwrap();
        assert_eq!(stats.max(), 77);
        assert_eq!(stats.min(), 77);
        assert_eq!(stats.avg(), 77.0);
    }

    #[test]
    fn mean_lies_between_extrema() {
        // Deterministic pseudo-random frames.
        let mut seed = 0x2545_f491_u32;
        for len in [1usize, 2, 3, 17, 256] {
            let samples: Vec<u8> = (0..len)
                .map(|_| {
                    seed ^= seed << 13;
                    seed ^= seed >> 17;
                    seed ^= seed << 5;
                    (seed >> 24) as u8
                })
                .collect();
            let stats = FrameStats::new(&samples).unwrap();
            assert!(stats.max() as f64 >= stats.avg());
            assert!(stats.avg() >= stats.min() as f64);
            assert_eq!(stats.max(), *samples.iter().max().unwrap());
            assert_eq!(stats.min(), *samples.iter().min().unwrap());
        }
    }

    #[test]
    fn scan_is_deferred_until_first_access() {
        let samples = [1u8, 2, 3];
        let stats = FrameStats::new(&samples).unwrap();
        assert!(!stats.is_computed());
        assert_eq!(stats.min(), 1);
        assert!(stats.is_computed());
        assert_eq!(stats.summary().avg, 2.0);
    }
}
