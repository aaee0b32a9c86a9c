//! Drawing surface used by the dashboard layout

use crate::models::chart::Rect;
use crate::utils::errors::DashResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Black,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Normal,
    Large,
}

impl FontSize {
    pub fn points(self) -> f64 {
        match self {
            FontSize::Normal => 18.0,
            FontSize::Large => 28.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Something the dashboard can be drawn on
///
/// Rectangles are half-open (`x0..x1`, `y0..y1`) and corners may be given
/// in any order.
pub trait Canvas {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, colour: Colour) -> DashResult<()>;

    /// Draw `text` centred horizontally and vertically on (x, y)
    fn draw_text(&mut self, text: &str, x: i32, y: i32, colour: Colour, size: FontSize) -> DashResult<()>;

    /// 2 px black line; `position` is y for horizontal lines and x for vertical ones
    fn draw_line(&mut self, axis: Axis, position: i32, start: i32, length: i32) -> DashResult<()> {
        let limit = match axis {
            Axis::Horizontal => self.width(),
            Axis::Vertical => self.height(),
        };
        let cross_limit = match axis {
            Axis::Horizontal => self.height(),
            Axis::Vertical => self.width(),
        };
        let end = (start + length).min(limit);
        let position = (position - 1).clamp(0, (cross_limit - 2).max(0));

        match axis {
            Axis::Horizontal => self.fill_rect(start, position, end, position + 2, Colour::Black),
            Axis::Vertical => self.fill_rect(position, start, position + 2, end, Colour::Black),
        }
    }

    /// 1 px horizontal grid line
    fn draw_rule(&mut self, y: i32, start: i32, length: i32) -> DashResult<()> {
        let end = (start + length).min(self.width());
        self.fill_rect(start, y, end, y + 1, Colour::Black)
    }

    fn fill(&mut self, rect: Rect, colour: Colour) -> DashResult<()> {
        self.fill_rect(rect.x0, rect.y0, rect.x1, rect.y1, colour)
    }
}


#[cfg(test)]
mod tests {
    use super::recording::RecordingCanvas;
    use super::*;

    #[test]
    fn test_lines_are_two_pixels_and_clamped() {
        let mut canvas = RecordingCanvas::default();
        canvas.draw_line(Axis::Horizontal, 460, 700, 200).unwrap();
        canvas.draw_line(Axis::Vertical, 0, 200, 400).unwrap();

        let rects = canvas.rects();
        assert_eq!(rects[0].0, Rect::new(700, 459, 800, 461));
        assert_eq!(rects[1].0, Rect::new(0, 200, 2, 480));
    }

    #[test]
    fn test_rule_is_one_pixel() {
        let mut canvas = RecordingCanvas::default();
        canvas.draw_rule(300, 50, 350).unwrap();
        assert_eq!(canvas.rects()[0].0, Rect::new(50, 300, 400, 301));
    }
}
