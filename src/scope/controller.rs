//! Capture and frame-loop control.

use crate::analysis::{FrameSummary, SampleFrame, WINDOW_SIZE};
use crate::capture::{CaptureApi, SampleSource};
use crate::config::{DisplayConfig, SmoothingMode, WaveformBounds};
use crate::render::{HistoryRenderer, Surface, WaveformRenderer};

/// Layout and smoothing parameters for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSettings {
    /// Samples per analysis window
    pub window_size: usize,
    pub slice_count: usize,
    pub trailing_window: usize,
    pub smoothing: SmoothingMode,
    pub waveform_bounds: WaveformBounds,
}

impl ScopeSettings {
    pub fn from_config(display: &DisplayConfig) -> Self {
        Self {
            window_size: WINDOW_SIZE,
            slice_count: display.slice_count,
            trailing_window: display.trailing_window,
            smoothing: display.smoothing,
            waveform_bounds: display.waveform_bounds,
        }
    }
}

impl Default for ScopeSettings {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}

/// What the scheduler wants done next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Sample a new frame and redraw
    Frame,
    /// Redraw the last frame without sampling
    Paused,
    /// Leave the loop
    Stop,
}

/// User action that starts capture.
pub trait Trigger {
    /// Blocks until the user starts capture (`true`) or backs out (`false`).
    fn wait_for_trigger(&mut self) -> anyhow::Result<bool>;
}

/// Blocking, user-visible error report.
pub trait Notifier {
    fn notify_error(&mut self, message: &str) -> anyhow::Result<()>;
}

/// Paces the frame loop.
pub trait FrameScheduler {
    /// Waits for the next tick.
    fn next_tick(&mut self) -> anyhow::Result<Tick>;
}

/// The two charts plus whatever else the host shows around them.
pub trait ScopeView {
    type Surface: Surface;

    /// Waveform and history surfaces, in that order.
    fn surfaces(&mut self) -> (&mut Self::Surface, &mut Self::Surface);

    /// Shows the current surfaces and status.
    fn present(&mut self, status: &FrameStatus) -> anyhow::Result<()>;
}

/// Per-tick summary handed to [`ScopeView::present`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStatus {
    /// Statistics of the latest sampled frame
    pub stats: Option<FrameSummary>,
    pub ticks: u64,
    pub history_cursor: usize,
    pub history_len: usize,
    pub paused: bool,
}

/// How a call to [`run_scope`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOutcome {
    /// The user backed out before capture was requested
    Dismissed,
    /// The input stream could not be acquired; the loop never ran
    CaptureFailed,
    /// The loop ran and was stopped after `ticks` sampled frames
    Stopped { ticks: u64 },
}

/// Acquires the input stream and builds sessions around it.
#[derive(Debug, Clone, Default)]
pub struct ScopeController {
    settings: ScopeSettings,
}

impl ScopeController {
    pub fn new(settings: ScopeSettings) -> Self {
        Self { settings }
    }

    /// Requests audio once.
    ///
    /// On failure the cause is logged, `notifier` is shown exactly one error and
    /// `None` is returned. There is no retry.
    pub fn start<C, N>(
        &self,
        capture: &mut C,
        notifier: &mut N,
    ) -> anyhow::Result<Option<ScopeSession<C::Source>>>
    where
        C: CaptureApi,
        N: Notifier + ?Sized,
    {
        match capture.request_audio(self.settings.window_size) {
            Ok(source) => {
                tracing::info!("Capturing from {}", source.name());
                Ok(Some(ScopeSession::new(source, &self.settings)))
            }
            Err(err) => {
                tracing::error!("Error getting audio: {err:?}");
                notifier.notify_error(&format!("Error getting audio\n\n{err}"))?;
                Ok(None)
            }
        }
    }
}

/// A running scope: one source, one frame buffer, both renderers.
pub struct ScopeSession<S> {
    source: S,
    frame: SampleFrame,
    waveform: WaveformRenderer,
    history: HistoryRenderer,
    status: FrameStatus,
}

impl<S: SampleSource> ScopeSession<S> {
    pub fn new(source: S, settings: &ScopeSettings) -> Self {
        let history = HistoryRenderer::new(
            settings.window_size,
            settings.slice_count,
            settings.trailing_window,
            settings.smoothing,
        );
        Self {
            source,
            frame: SampleFrame::new(settings.window_size),
            waveform: WaveformRenderer::new(settings.slice_count, settings.waveform_bounds),
            status: FrameStatus {
                stats: None,
                ticks: 0,
                history_cursor: history.cursor(),
                history_len: history.history().len(),
                paused: false,
            },
            history,
        }
    }

    /// Samples one frame, feeds both renderers and presents the result.
    pub fn tick<V: ScopeView + ?Sized>(&mut self, view: &mut V) -> anyhow::Result<()> {
        self.source.read_time_domain(&mut self.frame);

        let (waveform_surface, history_surface) = view.surfaces();
        self.waveform.render(self.frame.as_slice(), waveform_surface);
        let ingest = self.history.render(self.frame.as_slice(), history_surface)?;

        if let Some(value) = ingest.flushed {
            tracing::trace!("History slot {} <- {:.1}", self.status.history_cursor, value);
        }

        self.status = FrameStatus {
            stats: Some(ingest.stats),
            ticks: self.status.ticks + 1,
            history_cursor: self.history.cursor(),
            history_len: self.history.history().len(),
            paused: false,
        };

        view.present(&self.status)
    }

    /// Runs ticks until the scheduler says stop. Returns the number of sampled frames.
    pub fn run<H>(&mut self, host: &mut H) -> anyhow::Result<u64>
    where
        H: FrameScheduler + ScopeView + ?Sized,
    {
        loop {
            match host.next_tick()? {
                Tick::Frame => self.tick(host)?,
                Tick::Paused => {
                    self.status.paused = true;
                    host.present(&self.status)?;
                }
                Tick::Stop => break,
            }

            if self.status.ticks > 0 && self.status.ticks % 600 == 0 {
                tracing::debug!("Scope: {} frames rendered", self.status.ticks);
            }
        }

        tracing::info!("Scope stopped after {} frames", self.status.ticks);
        Ok(self.status.ticks)
    }

    pub fn status(&self) -> &FrameStatus {
        &self.status
    }

    pub fn history(&self) -> &HistoryRenderer {
        &self.history
    }
}

/// Waits for the trigger, acquires audio, and runs the loop until stopped.
pub fn run_scope<C, H>(
    controller: &ScopeController,
    capture: &mut C,
    host: &mut H,
) -> anyhow::Result<ScopeOutcome>
where
    C: CaptureApi,
    H: Trigger + Notifier + FrameScheduler + ScopeView,
{
    if !host.wait_for_trigger()? {
        tracing::info!("Capture dismissed before start");
        return Ok(ScopeOutcome::Dismissed);
    }

    match controller.start(capture, host)? {
        Some(mut session) => {
            let ticks = session.run(host)?;
            Ok(ScopeOutcome::Stopped { ticks })
        }
        None => Ok(ScopeOutcome::CaptureFailed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureError;
    use crate::render::testing::RecordingSurface;
    use std::collections::VecDeque;

    struct ConstantSource(u8);

    impl SampleSource for ConstantSource {
        fn read_time_domain(&mut self, frame: &mut SampleFrame) {
            frame.as_mut_slice().fill(self.0);
        }
    }

    struct FakeCapture {
        fail: bool,
        requests: usize,
    }

    impl FakeCapture {
        fn new(fail: bool) -> Self {
            Self { fail, requests: 0 }
        }
    }

    impl CaptureApi for FakeCapture {
        type Source = ConstantSource;

        fn request_audio(&mut self, window: usize) -> Result<ConstantSource, CaptureError> {
            assert_eq!(window, WINDOW_SIZE);
            self.requests += 1;
            if self.fail {
                Err(CaptureError::NoDefaultDevice)
            } else {
                Ok(ConstantSource(128))
            }
        }
    }

    struct FakeHost {
        trigger: bool,
        ticks: VecDeque<Tick>,
        scheduled: usize,
        notifications: Vec<String>,
        presented: Vec<FrameStatus>,
        waveform: RecordingSurface,
        history: RecordingSurface,
    }

    impl FakeHost {
        fn new(trigger: bool, ticks: &[Tick]) -> Self {
            Self {
                trigger,
                ticks: ticks.iter().copied().collect(),
                scheduled: 0,
                notifications: Vec::new(),
                presented: Vec::new(),
                waveform: RecordingSurface::new(200.0, 40.0),
                history: RecordingSurface::new(200.0, 40.0),
            }
        }
    }

    impl Trigger for FakeHost {
        fn wait_for_trigger(&mut self) -> anyhow::Result<bool> {
            Ok(self.trigger)
        }
    }

    impl Notifier for FakeHost {
        fn notify_error(&mut self, message: &str) -> anyhow::Result<()> {
            self.notifications.push(message.to_string());
            Ok(())
        }
    }

    impl FrameScheduler for FakeHost {
        fn next_tick(&mut self) -> anyhow::Result<Tick> {
            self.scheduled += 1;
            Ok(self.ticks.pop_front().unwrap_or(Tick::Stop))
        }
    }

    impl ScopeView for FakeHost {
        type Surface = RecordingSurface;

        fn surfaces(&mut self) -> (&mut RecordingSurface, &mut RecordingSurface) {
            (&mut self.waveform, &mut self.history)
        }

        fn present(&mut self, status: &FrameStatus) -> anyhow::Result<()> {
            self.presented.push(*status);
            Ok(())
        }
    }

    #[test]
    fn capture_failure_notifies_once_and_never_loops() {
        let controller = ScopeController::default();
        let mut capture = FakeCapture::new(true);
        let mut host = FakeHost::new(true, &[Tick::Frame, Tick::Frame]);

        let outcome = run_scope(&controller, &mut capture, &mut host).unwrap();

        assert_eq!(outcome, ScopeOutcome::CaptureFailed);
        assert_eq!(capture.requests, 1);
        assert_eq!(host.notifications.len(), 1);
        assert!(host.notifications[0].contains("No audio input device"));
        assert_eq!(host.scheduled, 0);
        assert!(host.presented.is_empty());
    }

    #[test]
    fn dismissed_trigger_never_requests_audio() {
        let controller = ScopeController::default();
        let mut capture = FakeCapture::new(false);
        let mut host = FakeHost::new(false, &[Tick::Frame]);

        let outcome = run_scope(&controller, &mut capture, &mut host).unwrap();

        assert_eq!(outcome, ScopeOutcome::Dismissed);
        assert_eq!(capture.requests, 0);
        assert!(host.notifications.is_empty());
    }

    #[test]
    fn loop_feeds_both_renderers_every_frame() {
        let controller = ScopeController::default();
        let mut capture = FakeCapture::new(false);
        let mut host = FakeHost::new(true, &[Tick::Frame; 6]);

        let outcome = run_scope(&controller, &mut capture, &mut host).unwrap();

        assert_eq!(outcome, ScopeOutcome::Stopped { ticks: 6 });
        assert_eq!(host.scheduled, 7);
        assert_eq!(host.waveform.clears, 6);
        assert_eq!(host.history.clears, 6);

        let last = host.presented.last().unwrap();
        assert_eq!(last.history_cursor, 2);
        assert_eq!(last.history_len, 100);
        assert_eq!(last.stats.unwrap().max, 128);
        assert!(host.notifications.is_empty());
    }

    #[test]
    fn waveform_steps_two_units_per_slice_on_a_200_wide_surface() {
        let controller = ScopeController::default();
        let mut capture = FakeCapture::new(false);
        let mut host = FakeHost::new(true, &[Tick::Frame]);

        run_scope(&controller, &mut capture, &mut host).unwrap();

        let stroke = &host.waveform.strokes[0];
        assert_eq!(stroke[1].x - stroke[0].x, 2.0);
        assert!(stroke.iter().all(|p| p.y == 20.0));
    }

    #[test]
    fn paused_ticks_redraw_without_sampling() {
        let controller = ScopeController::default();
        let mut capture = FakeCapture::new(false);
        let mut host = FakeHost::new(
            true,
            &[Tick::Frame, Tick::Paused, Tick::Paused, Tick::Frame],
        );

        let outcome = run_scope(&controller, &mut capture, &mut host).unwrap();

        assert_eq!(outcome, ScopeOutcome::Stopped { ticks: 2 });
        assert_eq!(host.presented.len(), 4);
        assert!(host.presented[1].paused);
        assert_eq!(host.presented[1].ticks, 1);
        assert!(!host.presented[3].paused);
        assert_eq!(host.waveform.clears, 2);
    }

    #[test]
    fn session_starts_with_an_empty_history() {
        let controller = ScopeController::new(ScopeSettings {
            slice_count: 10,
            ..ScopeSettings::default()
        });
        let mut capture = FakeCapture::new(false);
        let mut host = FakeHost::new(true, &[]);

        let session = controller.start(&mut capture, &mut host).unwrap().unwrap();
        assert_eq!(session.status().ticks, 0);
        assert_eq!(session.status().history_len, 10);
        assert!(session.history().history().iter().all(Option::is_none));
    }
}
