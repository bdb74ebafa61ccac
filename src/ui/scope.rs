//! Terminal host for the scope: start screen, two charts, footer and key handling.

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::Paragraph};
use std::io::{stdout, Stdout};
use std::time::Duration;

use super::canvas::CanvasSurface;
use super::error::show_until_keypress;
use crate::config::SmoothingMode;
use crate::scope::{FrameScheduler, FrameStatus, Notifier, ScopeView, Tick, Trigger};

const FOOTER_HEIGHT: u16 = 1;
const WAVEFORM_COLOR: Color = Color::Rgb(206, 224, 220);
const HISTORY_COLOR: Color = Color::Rgb(240, 180, 90);
const FOOTER_FG: Color = Color::Rgb(185, 207, 212);

/// Where each part of the scope goes on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeLayout {
    pub waveform: Rect,
    pub history: Rect,
    pub footer: Rect,
}

impl ScopeLayout {
    /// Waveform on top, history below it, a one-line footer at the bottom.
    pub fn new(area: Rect) -> Self {
        let content_height = area.height.saturating_sub(FOOTER_HEIGHT);
        let waveform_height = content_height / 2;

        Self {
            waveform: Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: waveform_height,
            },
            history: Rect {
                x: area.x,
                y: area.y + waveform_height,
                width: area.width,
                height: content_height - waveform_height,
            },
            footer: Rect {
                x: area.x,
                y: area.y + content_height,
                width: area.width,
                height: area.height.min(FOOTER_HEIGHT),
            },
        }
    }
}

/// Options for [`ScopeTui::new`].
#[derive(Debug, Clone)]
pub struct ScopeTuiOptions {
    /// Shown on the start screen
    pub device_label: String,
    pub smoothing: SmoothingMode,
    pub frame_interval: Duration,
    /// Skip the start screen and capture immediately
    pub auto_start: bool,
}

/// Crossterm/ratatui implementation of every capability the scope loop needs.
pub struct ScopeTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    layout: ScopeLayout,
    waveform: CanvasSurface,
    history: CanvasSurface,
    options: ScopeTuiOptions,
    paused: bool,
    active: bool,
}

impl ScopeTui {
    /// Enters raw mode and the alternate screen, and sizes both charts to the current terminal.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    /// - If alternate screen cannot be entered
    pub fn new(options: ScopeTuiOptions) -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let size = terminal.size()?;
        let layout = ScopeLayout::new(Rect::new(0, 0, size.width, size.height));
        tracing::debug!(
            "Scope layout: waveform {:?}, history {:?}",
            layout.waveform,
            layout.history
        );

        Ok(Self {
            terminal,
            waveform: CanvasSurface::new("waveform", layout.waveform, WAVEFORM_COLOR),
            history: CanvasSurface::new("history", layout.history, HISTORY_COLOR),
            layout,
            options,
            paused: false,
            active: true,
        })
    }

    fn draw_start_screen(&mut self) -> anyhow::Result<()> {
        let device = self.options.device_label.clone();
        self.terminal.draw(|frame| {
            let area = frame.area();
            let text = vec![
                Line::from(Span::styled(
                    "micscope",
                    Style::default().fg(WAVEFORM_COLOR).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("Input device: {device}")),
                Line::from(""),
                Line::from("Press Enter to start capture, Esc or q to quit"),
            ];
            let height = text.len() as u16;
            let paragraph = Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(FOOTER_FG).bg(Color::Rgb(0, 0, 0)));
            let centered = Rect {
                x: area.x,
                y: area.y + (area.height / 2).saturating_sub(height / 2),
                width: area.width,
                height,
            }
            .intersection(area);
            frame.render_widget(paragraph, centered);
        })?;
        Ok(())
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ScopeTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

impl Trigger for ScopeTui {
    fn wait_for_trigger(&mut self) -> anyhow::Result<bool> {
        if self.options.auto_start {
            return Ok(true);
        }

        loop {
            self.draw_start_screen()?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    match key.code {
                        KeyCode::Enter => {
                            tracing::debug!("Enter pressed: starting capture");
                            return Ok(true);
                        }
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(false)
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

impl Notifier for ScopeTui {
    fn notify_error(&mut self, message: &str) -> anyhow::Result<()> {
        show_until_keypress(&mut self.terminal, message)
    }
}

impl FrameScheduler for ScopeTui {
    fn next_tick(&mut self) -> anyhow::Result<Tick> {
        if event::poll(self.options.frame_interval)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::debug!("Escape or 'q' pressed: stopping scope");
                        return Ok(Tick::Stop);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        tracing::debug!("Ctrl+C pressed: stopping scope");
                        return Ok(Tick::Stop);
                    }
                    KeyCode::Char(' ') => {
                        self.paused = !self.paused;
                        tracing::debug!("Scope {}", if self.paused { "paused" } else { "resumed" });
                    }
                    _ => {}
                }
            }
        }

        Ok(if self.paused { Tick::Paused } else { Tick::Frame })
    }
}

impl ScopeView for ScopeTui {
    type Surface = CanvasSurface;

    fn surfaces(&mut self) -> (&mut CanvasSurface, &mut CanvasSurface) {
        (&mut self.waveform, &mut self.history)
    }

    fn present(&mut self, status: &FrameStatus) -> anyhow::Result<()> {
        let layout = self.layout;
        let footer = footer_line(status, self.options.smoothing);
        let waveform = &self.waveform;
        let history = &self.history;

        self.terminal.draw(|frame| {
            let bounds = frame.area();
            frame.render_widget(waveform.widget(), layout.waveform.intersection(bounds));
            frame.render_widget(history.widget(), layout.history.intersection(bounds));
            frame.render_widget(
                Paragraph::new(footer).style(Style::default().fg(FOOTER_FG).bg(Color::Rgb(0, 0, 0))),
                layout.footer.intersection(bounds),
            );
        })?;
        Ok(())
    }
}

/// Status line: run indicator, frame statistics, history position and frame count.
pub fn footer_line(status: &FrameStatus, smoothing: SmoothingMode) -> Line<'static> {
    let indicator = if status.paused {
        Span::styled("⏸ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("● ", Style::default().fg(Color::Red))
    };

    let stats = match status.stats {
        Some(stats) => format!("max {} / min {} / avg {:.1}", stats.max, stats.min, stats.avg),
        None => "max - / min - / avg -".to_string(),
    };

    Line::from(vec![
        indicator,
        Span::raw(stats),
        Span::raw(format!(
            " / history {}/{} ({smoothing})",
            status.history_cursor, status.history_len
        )),
        Span::raw(format!(" / frames {}", status.ticks)),
        Span::styled("   space pause, q quit", Style::default().add_modifier(Modifier::DIM)),
    ])
}
