//! Braille canvas implementation of the drawing surface.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine, Points},
        Block,
    },
};

use crate::render::{Point, Surface};

/// A chart area backed by a ratatui braille canvas.
///
/// Strokes are kept in top-down surface coordinates and flipped when painted,
/// since the canvas puts its origin in the bottom-left corner. The size is taken
/// from the area given at construction and never changes afterwards.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    title: &'static str,
    color: Color,
    width: f64,
    height: f64,
    strokes: Vec<Vec<Point>>,
}

impl CanvasSurface {
    /// Sizes the surface to the inside of a bordered block at `area`, one unit per braille dot.
    pub fn new(title: &'static str, area: Rect, color: Color) -> Self {
        let inner = Block::bordered().inner(area);
        Self {
            title,
            color,
            width: f64::from(inner.width) * 2.0,
            height: f64::from(inner.height) * 4.0,
            strokes: Vec::new(),
        }
    }

    /// Builds the widget for the current strokes.
    pub fn widget(&self) -> Canvas<'_, impl Fn(&mut Context) + '_> {
        let height = self.height;
        let color = self.color;
        Canvas::default()
            .block(
                Block::bordered()
                    .title(self.title)
                    .border_style(Style::default().fg(Color::Rgb(185, 207, 212))),
            )
            .background_color(Color::Rgb(0, 0, 0))
            .marker(Marker::Braille)
            .x_bounds([0.0, self.width])
            .y_bounds([0.0, self.height])
            .paint(move |ctx| {
                for stroke in &self.strokes {
                    if let [only] = stroke.as_slice() {
                        ctx.draw(&Points {
                            coords: &[(only.x, height - only.y)],
                            color,
                        });
                    }
                    for pair in stroke.windows(2) {
                        ctx.draw(&CanvasLine::new(
                            pair[0].x,
                            height - pair[0].y,
                            pair[1].x,
                            height - pair[1].y,
                            color,
                        ));
                    }
                }
            })
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.strokes.clear();
    }

    fn stroke(&mut self, points: &[Point]) {
        self.strokes.push(points.to_vec());
    }
}
