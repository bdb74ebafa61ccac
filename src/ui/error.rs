//! Generic error screen for displaying human-readable error messages.
//!
//! Provides a full-screen error display with centered text. The same drawing is used
//! by the scope itself when audio capture fails.

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::Paragraph};
use std::io::{self, Stdout};

const ERROR_BG: Color = Color::Rgb(255, 0, 0);
const ERROR_FG: Color = Color::Rgb(255, 255, 255);

/// Standalone error screen for failures that happen before the scope is up.
pub struct ErrorScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl ErrorScreen {
    /// Creates a new error screen and enters alternate screen mode.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    /// - If alternate screen cannot be entered
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(ErrorScreen {
            terminal,
            active: true,
        })
    }

    /// Shows `error_message` until any key is pressed.
    pub fn show_error(&mut self, error_message: &str) -> anyhow::Result<()> {
        show_until_keypress(&mut self.terminal, error_message)
    }

    /// Cleans up terminal state and exits alternate screen mode.
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

impl Drop for ErrorScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Redraws the error screen on `terminal` until a key is pressed.
pub fn show_until_keypress<B: Backend>(
    terminal: &mut Terminal<B>,
    error_message: &str,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| draw_error(frame, error_message))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(_) = event::read()? {
                break;
            }
        }
    }
    Ok(())
}

/// Paints a full red screen with `error_message` centred in white, wrapped to 80% width.
pub fn draw_error(frame: &mut Frame, error_message: &str) {
    let area = frame.area();
    frame
        .buffer_mut()
        .set_style(area, Style::default().bg(ERROR_BG));

    let padding_x = area.width / 10;
    let text_width = (u32::from(area.width) * 80 / 100) as u16;

    let lines: Vec<Line> = error_message
        .lines()
        .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(ERROR_FG).bg(ERROR_BG))))
        .collect();
    let text_height = lines.len() as u16;

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true });

    let centered_area = Rect {
        x: area.x + padding_x,
        y: area.y + (area.height / 2).saturating_sub(text_height / 2),
        width: text_width,
        height: area.height / 2 + text_height / 2,
    }
    .intersection(area);

    frame.render_widget(paragraph, centered_area);
}
