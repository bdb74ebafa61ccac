//! Smoothed level history chart.
//!
//! Every rendered frame contributes its maximum to a short smoothing buffer. When
//! that buffer holds `trailing_window` values their mean is written into a circular
//! history of `slice_count` slots, which is then drawn across the surface.

use std::collections::VecDeque;

use thiserror::Error;

use super::{amplitude_y, slice_step, Point, Surface};
use crate::analysis::{FrameStats, FrameSummary, StatsError};
use crate::config::SmoothingMode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("expected a frame of {expected} samples, got {actual}")]
    FrameLength { expected: usize, actual: usize },
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Outcome of ingesting one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ingest {
    pub stats: FrameSummary,
    /// Value written to the history by this frame, if any
    pub flushed: Option<f64>,
}

/// Owns the smoothing buffer, the history ring and its write cursor.
#[derive(Debug, Clone)]
pub struct HistoryRenderer {
    frame_len: usize,
    trailing_window: usize,
    mode: SmoothingMode,
    smoothing: VecDeque<f64>,
    history: Vec<Option<f64>>,
    cursor: usize,
    run: Vec<Point>,
}

impl HistoryRenderer {
    /// Creates a renderer for frames of `frame_len` samples.
    ///
    /// `slice_count` and `trailing_window` must both be at least 1.
    pub fn new(
        frame_len: usize,
        slice_count: usize,
        trailing_window: usize,
        mode: SmoothingMode,
    ) -> Self {
        debug_assert!(slice_count > 0 && trailing_window > 0);
        Self {
            frame_len,
            trailing_window,
            mode,
            smoothing: VecDeque::with_capacity(trailing_window + 1),
            history: vec![None; slice_count],
            cursor: 0,
            run: Vec::with_capacity(slice_count),
        }
    }

    /// Ingests `frame` and redraws the whole history onto `surface`.
    ///
    /// # Errors
    /// - If `frame` is not exactly the configured frame length; no state changes
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        frame: &[u8],
        surface: &mut S,
    ) -> Result<Ingest, RenderError> {
        let ingest = self.ingest(frame)?;
        self.draw(surface);
        Ok(ingest)
    }

    /// Adds the frame's maximum to the smoothing buffer and flushes it if full.
    pub fn ingest(&mut self, frame: &[u8]) -> Result<Ingest, RenderError> {
        if frame.len() != self.frame_len {
            return Err(RenderError::FrameLength {
                expected: self.frame_len,
                actual: frame.len(),
            });
        }

        let stats = FrameStats::new(frame)?;
        self.smoothing.push_back(f64::from(stats.max()));
        if self.mode == SmoothingMode::Sliding && self.smoothing.len() > self.trailing_window {
            self.smoothing.pop_front();
        }

        let flushed = if self.smoothing.len() >= self.trailing_window {
            let mean = self.smoothing.iter().sum::<f64>() / self.smoothing.len() as f64;
            self.write(mean);
            if self.mode == SmoothingMode::Block {
                self.smoothing.clear();
            }
            Some(mean)
        } else {
            None
        };

        Ok(Ingest {
            stats: stats.summary(),
            flushed,
        })
    }

    fn write(&mut self, value: f64) {
        self.history[self.cursor] = Some(value);
        self.cursor = (self.cursor + 1) % self.history.len();
    }

    /// Clears `surface` and strokes the history, one polyline per run of written slots.
    ///
    /// Slots that have never been written break the line.
    pub fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let step = slice_step(surface.width(), self.history.len());
        let height = surface.height();

        surface.clear();
        self.run.clear();
        for (i, slot) in self.history.iter().enumerate() {
            match slot {
                Some(value) => self
                    .run
                    .push(Point::new(i as f64 * step, amplitude_y(*value, height))),
                None if !self.run.is_empty() => {
                    surface.stroke(&self.run);
                    self.run.clear();
                }
                None => {}
            }
        }
        if !self.run.is_empty() {
            surface.stroke(&self.run);
        }
    }

    pub fn history(&self) -> &[Option<f64>] {
        &self.history
    }

    /// Slot the next smoothed value will be written to.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Maxima waiting in the smoothing buffer.
    pub fn pending(&self) -> usize {
        self.smoothing.len()
    }

    /// Forgets all history and pending maxima.
    pub fn reset(&mut self) {
        self.smoothing.clear();
        self.history.fill(None);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::RecordingSurface;

    const FRAME: usize = 256;

    fn block() -> HistoryRenderer {
        HistoryRenderer::new(FRAME, 100, 3, SmoothingMode::Block)
    }

    /// A frame whose maximum is `max`.
    fn frame(max: u8) -> Vec<u8> {
        let mut samples = vec![max / 2; FRAME];
        samples[FRAME / 3] = max;
        samples
    }

    fn written(renderer: &HistoryRenderer) -> usize {
        renderer.history().iter().filter(|slot| slot.is_some()).count()
    }

    #[test]
    fn three_frames_make_one_entry() {
        let mut renderer = block();
        for _ in 0..3 {
            renderer.ingest(&frame(200)).unwrap();
        }
        assert_eq!(written(&renderer), 1);
        assert_eq!(renderer.history()[0], Some(200.0));
        assert_eq!(renderer.pending(), 0);
        assert_eq!(renderer.cursor(), 1);
    }

    #[test]
    fn six_frames_make_two_entries() {
        let mut renderer = block();
        for _ in 0..6 {
            renderer.ingest(&frame(90)).unwrap();
        }
        assert_eq!(written(&renderer), 2);
        assert_eq!(&renderer.history()[..2], &[Some(90.0), Some(90.0)]);
    }

    #[test]
    fn partial_window_writes_nothing() {
        let mut renderer = block();
        let first = renderer.ingest(&frame(150)).unwrap();
        let second = renderer.ingest(&frame(150)).unwrap();
        assert_eq!(first.flushed, None);
        assert_eq!(second.flushed, None);
        assert_eq!(written(&renderer), 0);
        assert_eq!(renderer.pending(), 2);
    }

    #[test]
    fn block_mean_covers_only_its_own_window() {
        let mut renderer = block();
        for max in [130, 140, 150, 200, 210, 220] {
            renderer.ingest(&frame(max)).unwrap();
        }
        assert_eq!(&renderer.history()[..2], &[Some(140.0), Some(210.0)]);
    }

    #[test]
    fn cursor_wraps_and_overwrites_oldest_slot() {
        let mut renderer = HistoryRenderer::new(FRAME, 100, 1, SmoothingMode::Block);
        let len = renderer.history().len();
        for k in 1..=5usize {
            let mut renderer = renderer.clone();
            for n in 0..len + k {
                renderer.ingest(&frame((n % 250) as u8)).unwrap();
            }
            let last = ((len + k - 1) % 250) as f64;
            assert_eq!(renderer.cursor(), k % len);
            assert_eq!(renderer.history()[k - 1], Some(last));
            assert_eq!(renderer.history().len(), len);
        }
        renderer.reset();
        assert_eq!(renderer.cursor(), 0);
        assert_eq!(written(&renderer), 0);
    }

    #[test]
    fn wrap_around_through_block_windows() {
        let mut renderer = block();
        let len = renderer.history().len();
        let k = 7;
        for n in 0..(len + k) {
            let max = if n == len + k - 1 { 250 } else { 100 };
            for _ in 0..3 {
                renderer.ingest(&frame(max)).unwrap();
            }
        }
        assert_eq!(renderer.cursor(), k % len);
        assert_eq!(renderer.history()[k - 1], Some(250.0));
    }

    #[test]
    fn sliding_mode_writes_every_frame_after_warm_up() {
        let mut renderer = HistoryRenderer::new(FRAME, 100, 3, SmoothingMode::Sliding);
        let flushed: Vec<Option<f64>> = [30, 60, 90, 120, 150]
            .into_iter()
            .map(|max| renderer.ingest(&frame(max)).unwrap().flushed)
            .collect();
        assert_eq!(flushed, vec![None, None, Some(60.0), Some(90.0), Some(120.0)]);
        assert_eq!(renderer.pending(), 3);
        assert_eq!(renderer.cursor(), 3);
    }

    #[test]
    fn wrong_frame_length_leaves_state_untouched() {
        let mut renderer = block();
        let mut surface = RecordingSurface::new(200.0, 60.0);
        let err = renderer.render(&[128; 10], &mut surface).unwrap_err();
        assert_eq!(
            err,
            RenderError::FrameLength {
                expected: FRAME,
                actual: 10
            }
        );
        assert_eq!(renderer.pending(), 0);
        assert_eq!(surface.clears, 0);
    }

    #[test]
    fn draw_spans_the_surface_and_skips_unset_slots() {
        let mut renderer = block();
        let mut surface = RecordingSurface::new(200.0, 60.0);
        for _ in 0..6 {
            renderer.render(&frame(128), &mut surface).unwrap();
        }

        assert_eq!(surface.strokes.len(), 1);
        let stroke = &surface.strokes[0];
        assert_eq!(stroke, &vec![Point::new(0.0, 30.0), Point::new(2.0, 30.0)]);
    }

    #[test]
    fn gaps_split_the_history_line() {
        let mut renderer = HistoryRenderer::new(FRAME, 4, 1, SmoothingMode::Block);
        for max in [10, 20, 30, 40, 50] {
            renderer.ingest(&frame(max)).unwrap();
        }
        // Slots now hold 50, 20, 30, 40.
        renderer.history[2] = None;

        let mut surface = RecordingSurface::new(8.0, 10.0);
        renderer.draw(&mut surface);
        assert_eq!(surface.strokes.len(), 2);
        assert_eq!(surface.strokes[0].len(), 2);
        assert_eq!(surface.strokes[1][0].x, 6.0);
    }

    #[test]
    fn render_reports_frame_statistics() {
        let mut renderer = block();
        let mut surface = RecordingSurface::new(200.0, 60.0);
        let ingest = renderer.render(&frame(180), &mut surface).unwrap();
        assert_eq!(ingest.stats.max, 180);
        assert_eq!(ingest.stats.min, 90);
    }
}
