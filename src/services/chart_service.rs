use tracing::warn;

use crate::models::{AxisRange, BarSegment, Column, HourlyForecastPoint, PriceSeries, Rect};
use crate::services::forecast_service;
use crate::utils::canvas::{Axis, Canvas, Colour, FontSize};
use crate::utils::errors::DashResult;

/// Axis bounds are multiples of this
pub const AXIS_STEP: i32 = 10;

/// Round `data_min` down and `data_max` up to multiples of 10 and derive the
/// integer pixels-per-unit scale for a band `band_pixels` tall
///
/// A bound that would sit only one unit beyond the data is pushed one more
/// step out, and a flat series gets one extra step on top.
pub fn fit_axis(data_min: i32, data_max: i32, band_pixels: i32) -> AxisRange {
    let (lo, hi) = if data_min <= data_max {
        (data_min, data_max)
    } else {
        (data_max, data_min)
    };

    let mut min = lo.div_euclid(AXIS_STEP) * AXIS_STEP;
    if lo - min == 1 {
        min -= AXIS_STEP;
    }

    let mut max = hi + (AXIS_STEP - hi.rem_euclid(AXIS_STEP)) % AXIS_STEP;
    if max - hi == 1 {
        max += AXIS_STEP;
    }

    if max - min < AXIS_STEP {
        max += AXIS_STEP;
    }

    AxisRange {
        min,
        max,
        pixels_per_unit: (band_pixels / (max - min)).max(1),
    }
}

/// Split `value` into full blocks of `capacity` stacked up from `baseline`,
/// followed by one partial block for the remainder
///
/// Each full block is `capacity * scale` pixels including a `gap` pixel
/// separator. Non-positive values produce no blocks.
pub fn stack_bar(value: i64, capacity: i64, scale: f64, baseline: i32, gap: i32) -> Vec<BarSegment> {
    let capacity = capacity.max(1);
    let full_px = (capacity as f64 * scale) as i32;

    let mut segments = Vec::new();
    let mut remaining = value.max(0);
    let mut bottom = baseline;

    while remaining >= capacity {
        let top = bottom - full_px + gap;
        segments.push(BarSegment {
            value: capacity,
            top,
            bottom,
        });
        bottom = top - gap;
        remaining -= capacity;
    }

    if remaining > 0 {
        let top = bottom - (remaining as f64 * scale) as i32;
        segments.push(BarSegment {
            value: remaining,
            top,
            bottom,
        });
    }

    segments
}

/// Fixed-width columns with an extra gap at each new day
#[derive(Debug, Clone, Copy)]
pub struct SlotLayout {
    /// x before the first column
    pub origin: i32,
    pub slot_width: i32,
    pub boundary_gap: i32,
}

impl SlotLayout {
    /// Place one column per slot; a slot at hour 0 (other than the first)
    /// starts a new day and shifts it and every later column right
    pub fn columns(&self, slot_hours: &[u32]) -> Vec<Column> {
        let mut x = self.origin;
        slot_hours
            .iter()
            .enumerate()
            .map(|(i, &hour)| {
                x += self.slot_width;
                let separator = if i > 0 && hour == 0 {
                    x += self.boundary_gap;
                    Some(x - (self.slot_width + self.boundary_gap) / 2)
                } else {
                    None
                };
                Column { x, separator }
            })
            .collect()
    }
}

// Price chart geometry
const PRICE_LAYOUT: SlotLayout = SlotLayout {
    origin: 400,
    slot_width: 8,
    boundary_gap: 4,
};
const PRICE_BASELINE: i32 = 340;
const PRICE_BAND: i32 = 240;
const PRICE_BLOCK: i64 = 100;
const PRICE_BLOCK_GAP: i32 = 2;

/// Hourly price bars; past hours are drawn as thin bars
pub fn draw_price_chart<C: Canvas>(canvas: &mut C, series: &PriceSeries) -> DashResult<()> {
    if series.is_empty() {
        warn!("No prices to chart");
        return Ok(());
    }

    let tallest = series.max_price().unwrap_or(0).max(PRICE_BLOCK);
    let scale = PRICE_BAND as f64 / tallest as f64;

    let columns = PRICE_LAYOUT.columns(&series.slot_hours);
    for (i, (column, &price)) in columns.iter().zip(&series.prices).enumerate() {
        if let Some(sep) = column.separator {
            canvas.draw_line(Axis::Vertical, sep, PRICE_BASELINE - PRICE_BAND, PRICE_BAND)?;
        }

        let (left, right) = if i < series.current_index { (3, 4) } else { (0, 7) };
        for segment in stack_bar(price, PRICE_BLOCK, scale, PRICE_BASELINE, PRICE_BLOCK_GAP) {
            canvas.fill_rect(
                column.x + left,
                segment.top,
                column.x + right,
                segment.bottom,
                Colour::Black,
            )?;
        }
    }

    Ok(())
}

// Hourly weather graph geometry
const WEATHER_LAYOUT: SlotLayout = SlotLayout {
    origin: 50,
    slot_width: 7,
    boundary_gap: 4,
};
const TEMP_TOP: i32 = 230;
const TEMP_BOTTOM: i32 = 350;
const PRECIP_BASELINE: i32 = 375;
const PRECIP_PX_PER_MM: i32 = 5;
const GRAPH_TOP: i32 = 200;
const GRAPH_HEIGHT: i32 = 180;

/// Temperature, precipitation and sky icons for the hourly forecast
pub fn draw_weather_graph<C: Canvas>(canvas: &mut C, hours: &[HourlyForecastPoint]) -> DashResult<()> {
    if hours.is_empty() {
        return Ok(());
    }

    let min_tenths = hours.iter().map(|h| h.temperature_tenths).min().unwrap_or(0);
    let max_tenths = hours.iter().map(|h| h.temperature_tenths).max().unwrap_or(0);
    let axis = fit_axis(
        min_tenths.div_euclid(10),
        -((-max_tenths).div_euclid(10)),
        TEMP_BOTTOM - TEMP_TOP,
    );

    let slot_hours: Vec<u32> = hours.iter().map(|h| h.hour_of_day).collect();
    let columns = WEATHER_LAYOUT.columns(&slot_hours);

    for (column, hour) in columns.iter().zip(hours) {
        let x = column.x;
        if let Some(sep) = column.separator {
            canvas.draw_line(Axis::Vertical, sep, GRAPH_TOP, GRAPH_HEIGHT)?;
        }

        if hour.precipitation_amount > 0 {
            let height = hour.precipitation_amount.saturating_mul(PRECIP_PX_PER_MM);
            let top = PRECIP_BASELINE.saturating_sub(height).max(GRAPH_TOP);
            canvas.fill_rect(x - 3, top, x + 4, PRECIP_BASELINE, Colour::Black)?;
        }

        let y = axis.project(f64::from(hour.temperature_tenths) / 10.0, TEMP_BOTTOM);
        // white backing keeps the marker visible over precipitation bars
        canvas.fill_rect(x - 2, y - 2, x + 2, y + 2, Colour::White)?;
        for marker in temperature_marker(x, y) {
            canvas.fill(marker, Colour::Black)?;
        }

        for rect in forecast_service::icon_rects(hour.sky_cover, hour.precipitation, x) {
            canvas.fill(rect, Colour::Black)?;
        }
    }

    canvas.draw_text("cover", 25, 210, Colour::Black, FontSize::Normal)?;
    for degrees in axis.grid_values() {
        let y = axis.project(f64::from(degrees), TEMP_BOTTOM);
        canvas.draw_rule(y, 50, 350)?;
        canvas.draw_text(&format!("{}°C", degrees), 25, y, Colour::Black, FontSize::Normal)?;
    }
    canvas.draw_text("precip", 25, 370, Colour::Black, FontSize::Normal)?;

    Ok(())
}

fn temperature_marker(x: i32, y: i32) -> [Rect; 3] {
    [
        Rect::new(x - 2, y - 2, x + 2, y + 2),
        Rect::new(x - 3, y - 1, x + 3, y + 1),
        Rect::new(x - 1, y - 3, x + 1, y + 3),
    ]
}
