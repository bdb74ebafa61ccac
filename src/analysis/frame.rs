//! Fixed-width time-domain sample frames.

/// Number of samples in one analysis window.
pub const WINDOW_SIZE: usize = 256;

/// Byte value of a zero-amplitude sample.
pub const SILENCE: u8 = 128;

/// One window of unsigned 8-bit amplitude readings.
///
/// A frame is refilled in place every tick, so the scope allocates exactly one
/// for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFrame {
    samples: Vec<u8>,
}

impl SampleFrame {
    /// Creates a frame of `len` silent samples.
    pub fn new(len: usize) -> Self {
        Self {
            samples: vec![SILENCE; len],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.samples
    }
}

impl Default for SampleFrame {
    fn default() -> Self {
        Self::new(WINDOW_SIZE)
    }
}

impl From<Vec<u8>> for SampleFrame {
    fn from(samples: Vec<u8>) -> Self {
        Self { samples }
    }
}
