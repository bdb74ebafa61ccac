//! Instantaneous waveform chart.

use super::{amplitude_y, slice_step, Point, Surface};
use crate::config::WaveformBounds;

/// Draws one frame as a connected polyline.
#[derive(Debug, Clone)]
pub struct WaveformRenderer {
    slice_count: usize,
    bounds: WaveformBounds,
    points: Vec<Point>,
}

impl WaveformRenderer {
    pub fn new(slice_count: usize, bounds: WaveformBounds) -> Self {
        Self {
            slice_count,
            bounds,
            points: Vec::new(),
        }
    }

    pub fn slice_count(&self) -> usize {
        self.slice_count
    }

    /// Clears `surface` and strokes the frame across it.
    ///
    /// Sample `i` is placed at `i * width / slice_count`. A frame longer than the slice
    /// count therefore runs past the right edge unless the bounds are clamped.
    pub fn render<S: Surface + ?Sized>(&mut self, samples: &[u8], surface: &mut S) {
        let width = surface.width();
        let height = surface.height();
        let step = slice_step(width, self.slice_count);

        self.points.clear();
        for (i, &sample) in samples.iter().enumerate() {
            let x = i as f64 * step;
            if self.bounds == WaveformBounds::Clamped && x > width {
                break;
            }
            self.points.push(Point::new(x, amplitude_y(f64::from(sample), height)));
        }

        surface.clear();
        if !self.points.is_empty() {
            surface.stroke(&self.points);
        }
    }
}
