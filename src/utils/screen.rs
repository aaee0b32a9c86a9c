//! Raster canvas backed by plotters

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use tracing::debug;

use crate::models::Rect;
use crate::utils::canvas::{Canvas, Colour, FontSize};
use crate::utils::errors::{DashResult, DashboardError};

/// Family name the dashboard font is registered under
pub const FONT_FAMILY: &str = "dashboard";

/// Load a TrueType font from disk and make it available to every screen
///
/// The bytes live for the rest of the process, which is one render.
pub fn load_font(path: &std::path::Path) -> DashResult<()> {
    let bytes = std::fs::read(path)
        .map_err(|e| DashboardError::Font(format!("cannot read {}: {}", path.display(), e)))?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());

    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| DashboardError::Font(format!("invalid font {}", path.display())))?;

    debug!("Registered font {}", path.display());
    Ok(())
}

/// RGB pixel buffer drawn through a plotters bitmap backend
pub struct Screen<'a> {
    area: DrawingArea<BitMapBackend<'a>, Shift>,
}

impl<'a> Screen<'a> {
    /// Wrap `buffer` (3 bytes per pixel) and clear it to white
    pub fn new(buffer: &'a mut [u8], width: u32, height: u32) -> DashResult<Self> {
        let expected = (width * height * 3) as usize;
        if buffer.len() != expected {
            return Err(DashboardError::Render(format!(
                "buffer holds {} bytes, {}x{} needs {}",
                buffer.len(),
                width,
                height,
                expected
            )));
        }

        let area = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        area.fill(&WHITE).map_err(DashboardError::render)?;
        Ok(Self { area })
    }

    /// Flush pending drawing into the buffer
    pub fn present(self) -> DashResult<()> {
        self.area.present().map_err(DashboardError::render)
    }
}

fn rgb(colour: Colour) -> RGBColor {
    match colour {
        Colour::Black => BLACK,
        Colour::White => WHITE,
    }
}

impl Canvas for Screen<'_> {
    fn width(&self) -> i32 {
        self.area.dim_in_pixel().0 as i32
    }

    fn height(&self) -> i32 {
        self.area.dim_in_pixel().1 as i32
    }

    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, colour: Colour) -> DashResult<()> {
        let rect = Rect::new(x0, y0, x1, y1);
        if rect.is_empty() {
            return Ok(());
        }

        // the bitmap backend already stops short of the bottom-right corner
        self.area
            .draw(&Rectangle::new(
                [(rect.x0, rect.y0), (rect.x1, rect.y1)],
                rgb(colour).filled(),
            ))
            .map_err(DashboardError::render)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, colour: Colour, size: FontSize) -> DashResult<()> {
        let colour = rgb(colour);
        let style = TextStyle::from((FONT_FAMILY, size.points()).into_font())
            .color(&colour)
            .pos(Pos::new(HPos::Center, VPos::Center));

        self.area
            .draw(&Text::new(text.to_string(), (x, y), style))
            .map_err(DashboardError::render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pixel(buffer: &[u8], width: usize, x: usize, y: usize) -> u8 {
        buffer[(y * width + x) * 3]
    }

    #[test]
    fn test_fill_rect_is_half_open() {
        let mut buffer = vec![0u8; 10 * 10 * 3];
        {
            let mut screen = Screen::new(&mut buffer, 10, 10).unwrap();
            assert_eq!((screen.width(), screen.height()), (10, 10));
            screen.fill_rect(4, 4, 2, 2, Colour::Black).unwrap();
            // empty rectangles draw nothing
            screen.fill_rect(6, 6, 6, 9, Colour::Black).unwrap();
            screen.present().unwrap();
        }

        assert_eq!(pixel(&buffer, 10, 2, 2), 0);
        assert_eq!(pixel(&buffer, 10, 3, 3), 0);
        assert_eq!(pixel(&buffer, 10, 4, 4), 255);
        assert_eq!(pixel(&buffer, 10, 4, 2), 255);
        assert_eq!(pixel(&buffer, 10, 6, 7), 255);
        assert_eq!(pixel(&buffer, 10, 0, 0), 255);
    }

    #[test]
    fn test_one_pixel_shapes_are_drawn() {
        let mut buffer = vec![0u8; 20 * 20 * 3];
        {
            let mut screen = Screen::new(&mut buffer, 20, 20).unwrap();
            screen.draw_rule(5, 0, 20).unwrap();
            screen.fill_rect(10, 10, 11, 15, Colour::Black).unwrap();
            screen.fill_rect(2, 12, 6, 16, Colour::Black).unwrap();
            screen.present().unwrap();
        }

        // grid rule: row 5 only
        assert_eq!(pixel(&buffer, 20, 3, 5), 0);
        assert_eq!(pixel(&buffer, 20, 19, 5), 0);
        assert_eq!(pixel(&buffer, 20, 3, 4), 255);
        assert_eq!(pixel(&buffer, 20, 3, 6), 255);
        // 1 px wide stripe
        assert_eq!(pixel(&buffer, 20, 10, 12), 0);
        assert_eq!(pixel(&buffer, 20, 11, 12), 255);
        // 4x4 block keeps its last row and column
        assert_eq!(pixel(&buffer, 20, 2, 12), 0);
        assert_eq!(pixel(&buffer, 20, 5, 15), 0);
        assert_eq!(pixel(&buffer, 20, 6, 15), 255);
        assert_eq!(pixel(&buffer, 20, 5, 16), 255);
    }

    #[test]
    fn test_wrong_buffer_size() {
        let mut buffer = vec![0u8; 12];
        assert!(matches!(Screen::new(&mut buffer, 10, 10), Err(DashboardError::Render(_))));
    }

    #[test]
    fn test_missing_font() {
        let err = load_font(std::path::Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, DashboardError::Font(_)));
    }

    #[test]
    fn test_corrupt_font() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a truetype font").unwrap();

        let err = load_font(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::Font(_)));
    }
}
