//! Chart renderers and the drawing surface they target.
//!
//! Renderers only know about [`Surface`], a top-down 2D coordinate space with its
//! origin in the top-left corner. The terminal canvas in `ui` is one implementation;
//! tests use an in-memory recorder.

pub mod history;
pub mod waveform;

pub use history::{HistoryRenderer, Ingest, RenderError};
pub use waveform::WaveformRenderer;

/// A point in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D drawing target whose size is fixed when it is created.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    /// Erases everything stroked so far.
    fn clear(&mut self);
    /// Strokes one connected polyline through `points`.
    fn stroke(&mut self, points: &[Point]);
}

/// Horizontal distance between two adjacent slices.
pub fn slice_step(width: f64, slice_count: usize) -> f64 {
    width / slice_count as f64
}

/// Vertical position of an amplitude value; 128 lands on the vertical centre.
///
/// Not clamped: values above 128 map below the centre and can pass the bottom edge.
pub fn amplitude_y(value: f64, height: f64) -> f64 {
    (value / 128.0) * (height / 2.0)
}
