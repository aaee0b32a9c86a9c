//! Chart layout models

/// Rounded axis bounds and the vertical scale derived from them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
    pub pixels_per_unit: i32,
}

impl AxisRange {
    /// y pixel of `value`, counting up from `bottom`
    pub fn project(&self, value: f64, bottom: i32) -> i32 {
        let offset = (value - self.min as f64) * self.pixels_per_unit as f64;
        bottom - offset.round() as i32
    }

    /// Grid values from `min` to `max` in steps of 10
    pub fn grid_values(&self) -> impl Iterator<Item = i32> {
        (self.min..=self.max).step_by(10)
    }
}

/// Half-open pixel rectangle with x0 <= x1 and y0 <= y1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    /// Build from two corners in any order
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 == self.x1 || self.y0 == self.y1
    }
}

/// One block of a stacked bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSegment {
    /// Value units covered by this block
    pub value: i64,
    pub top: i32,
    pub bottom: i32,
}

/// Horizontal placement of one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub x: i32,
    /// x of the day separator drawn before this column, if any
    pub separator: Option<i32>,
}
